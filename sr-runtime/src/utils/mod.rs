/// Helpers for exercising a router without real network interfaces. Used by the unit tests in
/// this crate and the integration tests under `tests/`.
pub mod test;
