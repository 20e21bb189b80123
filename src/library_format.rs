//! Fragment library formats and their classification from alignment coordinates.
//!
//! Library types use the conventional codes: the first letter gives the mate
//! orientation (`I`nward, `O`utward, `M`atching; absent for single-end), then
//! `S`tranded or `U`nstranded, then for stranded libraries whether read 1
//! comes from the `F`orward or `R`everse strand. `ISF` is paired, inward,
//! read 1 forward; `SR` is single-end, reverse.

use crate::error::QuantError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadType {
    PairedEnd,
    SingleEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadOrientation {
    Toward,
    Away,
    Same,
    None,
}

/// Strand of read 1 / read 2. `S` and `A` are used when only one strand
/// matters (single-end reads or same-strand pairs), `SA` / `AS` give the
/// strands of read 1 then read 2, `U` is unstranded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadStrandedness {
    S,
    A,
    SA,
    AS,
    U,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LibraryFormat {
    pub read_type: ReadType,
    pub orientation: ReadOrientation,
    pub strandedness: ReadStrandedness,
}

impl LibraryFormat {
    pub const fn new(
        read_type: ReadType,
        orientation: ReadOrientation,
        strandedness: ReadStrandedness,
    ) -> Self {
        Self { read_type, orientation, strandedness }
    }

    /// The value handed out when a read could not be associated with any
    /// library type. It carries no usable format information.
    pub const fn invalid() -> Self {
        Self::new(ReadType::PairedEnd, ReadOrientation::None, ReadStrandedness::U)
    }

    /// Orientation is only meaningful for paired-end formats.
    pub fn is_valid(&self) -> bool {
        match self.read_type {
            ReadType::PairedEnd => self.orientation != ReadOrientation::None,
            ReadType::SingleEnd => self.orientation == ReadOrientation::None,
        }
    }

    pub fn is_paired(&self) -> bool {
        self.read_type == ReadType::PairedEnd
    }
}

impl fmt::Display for LibraryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ReadOrientation as O;
        use ReadStrandedness as St;
        let orient = match (self.read_type, self.orientation) {
            (ReadType::SingleEnd, _) => "",
            (ReadType::PairedEnd, O::Toward) => "I",
            (ReadType::PairedEnd, O::Away) => "O",
            (ReadType::PairedEnd, O::Same) => "M",
            (ReadType::PairedEnd, O::None) => "?",
        };
        let strand = match self.strandedness {
            St::U => "U",
            St::S | St::SA => "SF",
            St::A | St::AS => "SR",
        };
        write!(f, "{orient}{strand}")
    }
}

impl FromStr for LibraryFormat {
    type Err = QuantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ReadOrientation as O;
        use ReadStrandedness as St;
        use ReadType::{PairedEnd, SingleEnd};
        let code = s.trim().to_ascii_uppercase();
        let fmt = match code.as_str() {
            "U" => Self::new(SingleEnd, O::None, St::U),
            "SF" => Self::new(SingleEnd, O::None, St::S),
            "SR" => Self::new(SingleEnd, O::None, St::A),
            "IU" => Self::new(PairedEnd, O::Toward, St::U),
            "ISF" => Self::new(PairedEnd, O::Toward, St::SA),
            "ISR" => Self::new(PairedEnd, O::Toward, St::AS),
            "OU" => Self::new(PairedEnd, O::Away, St::U),
            "OSF" => Self::new(PairedEnd, O::Away, St::SA),
            "OSR" => Self::new(PairedEnd, O::Away, St::AS),
            "MU" => Self::new(PairedEnd, O::Same, St::U),
            "MSF" => Self::new(PairedEnd, O::Same, St::S),
            "MSR" => Self::new(PairedEnd, O::Same, St::A),
            _ => return Err(QuantError::UnknownLibraryType(s.to_string())),
        };
        Ok(fmt)
    }
}

/// Pairing status of a read-pair alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanStatus {
    LeftOrphan,
    RightOrphan,
    Paired,
}

impl fmt::Display for OrphanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrphanStatus::LeftOrphan => "left orphan",
            OrphanStatus::RightOrphan => "right orphan",
            OrphanStatus::Paired => "paired",
        };
        f.write_str(s)
    }
}

/// Library format of a mapped read pair.
///
/// Starts are 0-based reference positions as found in BAM records; a negative
/// start is the "unplaced" sentinel and cannot be classified. That is treated
/// as corrupted upstream state: the error is logged and returned as
/// [`QuantError::InvariantViolation`] so the caller can abort.
pub fn classify_paired(
    end1_start: i64,
    end1_fwd: bool,
    end2_start: i64,
    end2_fwd: bool,
) -> Result<LibraryFormat, QuantError> {
    use ReadOrientation as O;
    use ReadStrandedness as St;

    if end1_start < 0 || end2_start < 0 {
        tracing::error!(
            end1_start,
            end2_start,
            "could not associate any known library type with read pair"
        );
        return Err(QuantError::InvariantViolation(format!(
            "unplaced mate in paired hit (end1 start {end1_start}, end2 start {end2_start})"
        )));
    }

    let paired = |o, s| LibraryFormat::new(ReadType::PairedEnd, o, s);
    let fmt = match (end1_fwd, end2_fwd) {
        // read 1 forward: ISF when it starts first, otherwise OSF
        (true, false) if end1_start <= end2_start => paired(O::Toward, St::SA),
        (true, false) => paired(O::Away, St::SA),
        // read 2 forward: ISR when it starts first, otherwise OSR
        (false, true) if end2_start <= end1_start => paired(O::Toward, St::AS),
        (false, true) => paired(O::Away, St::AS),
        (true, true) => paired(O::Same, St::S),
        (false, false) => paired(O::Same, St::A),
    };
    Ok(fmt)
}

/// Library format of a single-end read (or an orphaned mate).
///
/// Unlike [`classify_paired`], an unclassifiable read is not an error: a
/// warning is logged and [`LibraryFormat::invalid`] is returned.
pub fn classify_single(start: i64, is_forward: bool) -> LibraryFormat {
    if start < 0 {
        tracing::warn!(start, "could not associate known library type with read");
        return LibraryFormat::invalid();
    }
    let strand = if is_forward { ReadStrandedness::S } else { ReadStrandedness::A };
    LibraryFormat::new(ReadType::SingleEnd, ReadOrientation::None, strand)
}
