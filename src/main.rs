//! imgtopdf - Convert images into a single PDF or PostScript document.

use std::process;

#[tokio::main]
async fn main() {
    let code = imgtopdf::run(std::env::args()).await;
    process::exit(code.as_i32());
}
