extern crate env_logger;
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate serde_urlencoded;

pub mod api_result;
pub mod controller;
pub mod kinds;
pub mod render;
pub mod store;
pub mod testkit;
pub mod toggle;
pub mod transport;

use std::io::Write;

pub fn init_logger() {
    let _ = env_logger::builder()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .is_test(true)
        .try_init();
}
