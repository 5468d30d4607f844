//! Integration tests for remark comment threads

mod cli_contracts;
mod order_independence;
mod scenarios;
mod support;
