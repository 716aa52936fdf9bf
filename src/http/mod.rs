//! HTTP/1.1 request machinery shared by the client and the HTTP data source.

pub mod orderedheaders;
pub mod response;
pub mod responsebody;
pub mod streamfactory;
pub mod transaction;

pub use self::orderedheaders::OrderedHeaderMap;
pub use self::response::HttpResponse;
pub use self::responsebody::ResponseBody;
