#![no_main]
use libfuzzer_sys::fuzz_target;
use nifti_header::{axis_codes, NiftiHeader};

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = NiftiHeader::from_reader(data) {
        let _ = header.rank();
        let _ = header.qform();
        let _ = header.sform();
        if let Some(affine) = header.affine {
            assert_eq!(header.axis_codes, Some(axis_codes(&affine)));
        }
    }
});
