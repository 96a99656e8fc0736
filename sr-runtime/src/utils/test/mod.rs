
pub use self::collectors::*;
