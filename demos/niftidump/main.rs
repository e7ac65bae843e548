//! An application for reading NIfTI header meta-data.

extern crate nifti_header;

use nifti_header::NiftiHeader;
use simple_logger::SimpleLogger;
use std::env;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .expect("Failed to initialize logger");

    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to NIfTI file is required");
    let header = NiftiHeader::from_file(filename).expect("Failed to read NIfTI file");
    println!("{:#?}", &header);
    match header.axis_codes {
        Some(codes) => println!("orientation: {}", codes.iter().collect::<String>()),
        None => println!("orientation: unknown (no valid qform or sform)"),
    }
}
