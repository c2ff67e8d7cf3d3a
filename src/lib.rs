#[macro_use]
extern crate failure;
#[macro_use]
extern crate lazy_static;

pub mod application_load_balancer_log_field;
pub mod common;
pub mod datasource;
pub mod parser;

pub use crate::application_load_balancer_log_field::ApplicationLoadBalancerLogField;
pub use crate::common::types::{Bytes, Host, LogEntry, ProcessingTime, Request, RequestType, StatusCodes, Value};
pub use crate::datasource::reader::{parse_file, ReadSummary, Reader, ReaderBuilder, ReaderError};
pub use crate::parser::{parse, LineParser, ParseErrorKind, ParseFailure, ParseResult, TargetStatusPolicy};
