//! Library shapes that can be quantified.
//!
//! Abundance emission only needs the transcripts, their clusters and the
//! number of mapped reads; [`QuantLibrary`] exposes exactly that (plus the
//! library type alignments are scored against), so a single alignment
//! library (paired or unpaired reads) and a merged experiment are processed
//! by the same code.

use crate::cluster::Cluster;
use crate::library_format::{LibraryFormat, ReadOrientation, ReadStrandedness, ReadType};
use crate::transcript::Transcript;
use std::marker::PhantomData;

pub trait QuantLibrary {
    fn transcripts(&self) -> &[Transcript];
    fn clusters(&self) -> &[Cluster];
    fn num_mapped_reads(&self) -> u64;

    /// Library type observed alignment formats are scored against.
    fn expected_format(&self) -> LibraryFormat;

    /// Split borrow used by projection: clusters are read while transcripts
    /// are written.
    fn clusters_and_transcripts_mut(&mut self) -> (&[Cluster], &mut [Transcript]);
}

/// Kind of fragment an alignment library holds.
pub trait FragmentKind {
    /// Library type assumed when none is given.
    fn default_format() -> LibraryFormat;
}

#[derive(Debug, Clone, Copy)]
pub struct PairedFragment;

#[derive(Debug, Clone, Copy)]
pub struct UnpairedFragment;

impl FragmentKind for PairedFragment {
    fn default_format() -> LibraryFormat {
        LibraryFormat::new(
            ReadType::PairedEnd,
            ReadOrientation::Toward,
            ReadStrandedness::U,
        )
    }
}

impl FragmentKind for UnpairedFragment {
    fn default_format() -> LibraryFormat {
        LibraryFormat::new(
            ReadType::SingleEnd,
            ReadOrientation::None,
            ReadStrandedness::U,
        )
    }
}

/// Transcripts, clusters and mapped-read count of one alignment file.
#[derive(Debug, Clone)]
pub struct AlignmentLibrary<F: FragmentKind> {
    transcripts: Vec<Transcript>,
    clusters: Vec<Cluster>,
    num_mapped_reads: u64,
    expected_format: LibraryFormat,
    _kind: PhantomData<F>,
}

impl<F: FragmentKind> AlignmentLibrary<F> {
    pub fn new(transcripts: Vec<Transcript>, clusters: Vec<Cluster>, num_mapped_reads: u64) -> Self {
        Self {
            transcripts,
            clusters,
            num_mapped_reads,
            expected_format: F::default_format(),
            _kind: PhantomData,
        }
    }

    pub fn with_expected_format(mut self, format: LibraryFormat) -> Self {
        self.expected_format = format;
        self
    }
}

impl<F: FragmentKind> QuantLibrary for AlignmentLibrary<F> {
    fn transcripts(&self) -> &[Transcript] {
        &self.transcripts
    }

    fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    fn num_mapped_reads(&self) -> u64 {
        self.num_mapped_reads
    }

    fn expected_format(&self) -> LibraryFormat {
        self.expected_format
    }

    fn clusters_and_transcripts_mut(&mut self) -> (&[Cluster], &mut [Transcript]) {
        (&self.clusters, &mut self.transcripts)
    }
}

/// One sequencing run contributing reads to a [`ReadExperiment`].
#[derive(Debug, Clone)]
pub struct ReadLibrary {
    pub format: LibraryFormat,
    pub num_mapped_reads: u64,
}

/// Several read libraries quantified against one transcript set.
#[derive(Debug, Clone)]
pub struct ReadExperiment {
    transcripts: Vec<Transcript>,
    clusters: Vec<Cluster>,
    read_libraries: Vec<ReadLibrary>,
}

impl ReadExperiment {
    pub fn new(transcripts: Vec<Transcript>, clusters: Vec<Cluster>) -> Self {
        Self { transcripts, clusters, read_libraries: Vec::new() }
    }

    pub fn add_read_library(&mut self, library: ReadLibrary) {
        self.read_libraries.push(library);
    }

    pub fn read_libraries(&self) -> &[ReadLibrary] {
        &self.read_libraries
    }
}

impl QuantLibrary for ReadExperiment {
    fn transcripts(&self) -> &[Transcript] {
        &self.transcripts
    }

    fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    fn num_mapped_reads(&self) -> u64 {
        self.read_libraries.iter().map(|l| l.num_mapped_reads).sum()
    }

    /// Format of the first read library; `IU` before any library is added.
    fn expected_format(&self) -> LibraryFormat {
        self.read_libraries
            .first()
            .map_or_else(PairedFragment::default_format, |l| l.format)
    }

    fn clusters_and_transcripts_mut(&mut self) -> (&[Cluster], &mut [Transcript]) {
        (&self.clusters, &mut self.transcripts)
    }
}
