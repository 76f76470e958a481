pub mod types;
pub mod utils;
pub mod env;
pub mod i18n;

pub use i18n::{Direction, Locale};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}
