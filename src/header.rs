use crate::error::QuantError;
use noodles::{bam, sam};
use std::path::Path;

/// True when both headers list the same references, in the same order, with
/// the same lengths.
pub fn headers_are_consistent(a: &sam::Header, b: &sam::Header) -> bool {
    let refs_a = a.reference_sequences();
    let refs_b = b.reference_sequences();
    refs_a.len() == refs_b.len()
        && refs_a
            .iter()
            .zip(refs_b.iter())
            .all(|((name_a, rs_a), (name_b, rs_b))| {
                name_a == name_b && rs_a.length() == rs_b.length()
            })
}

/// Compare every header with the first one.
pub fn all_headers_consistent(headers: &[sam::Header]) -> bool {
    match headers.split_first() {
        None => true,
        Some((first, rest)) => rest.iter().all(|h| headers_are_consistent(first, h)),
    }
}

/// Read the header of a SAM or BAM file, chosen by extension.
pub fn read_header(path: &Path) -> Result<sam::Header, QuantError> {
    let io_err = |source| QuantError::Io { path: path.to_path_buf(), source };
    let is_sam = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sam"));

    if is_sam {
        let mut reader = sam::io::reader::Builder::default()
            .build_from_path(path)
            .map_err(io_err)?;
        reader.read_header().map_err(io_err)
    } else {
        let mut reader = bam::io::reader::Builder
            .build_from_path(path)
            .map_err(io_err)?;
        reader.read_header().map_err(io_err)
    }
}
