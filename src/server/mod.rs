mod http;
pub mod raw;
mod request;
mod response;
mod service;

pub use http::{read_request, RawRequest};
pub use request::{parse_body, parse_query_params, parse_request, ParsedRequest};
pub use response::{write_response, HandlerResponse, ResponseBody};
pub use service::AppService;
