pub mod json;
pub mod object_id;
pub mod query;

pub use json::AppJson;
pub use object_id::IdPath;
pub use query::AppQuery;
