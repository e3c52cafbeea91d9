//! Command implementations.

pub mod enrich;
pub mod extract;
pub mod search;
pub mod stats;
pub mod status;
pub mod summary;
pub mod top;

pub use self::enrich::execute_enrich;
pub use self::extract::execute_extract;
pub use self::search::execute_search;
pub use self::stats::execute_stats;
pub use self::status::execute_status;
pub use self::summary::execute_summary;
pub use self::top::execute_top;
