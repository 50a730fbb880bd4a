//! Turns an [`AlignConfig`] into an executable [`AlignmentAlgorithm`].
//!
//! Configuration happens once per batch. Defaults are filled in, the
//! settings are validated against each other, and the kernel is chosen by
//! [`select_kernel`]. The chosen kernel is then monomorphised for the score
//! type (and lane count, for the vectorised kernel) and erased behind a
//! boxed closure, so the runtime choice costs one dynamic call per chunk.

use crate::{
    alignment::{
        AlignConfig, AlignmentResult, Band, BandMapping, ConfigError, DpScore, EditDistanceAligner, FreeEndGaps,
        GapCost, InputError, MatrixCoordinate, Method, OutputFlags, OutputSelection, ScalarAligner, ScalarMatchMismatch, ScalarMatrix,
        ResultData, ScoreType, ScoringScheme, SimdAligner, SimdMatchMismatch, SimdMatrix, SimdScoringProfile, TraceDirections, TrackingRule,
        AffineGapRecursion, scoring::convert_score,
    },
    execution::IndexedPair,
    math::ScoreInt,
    simd::{Lanes, lanes_for},
};
use log::debug;
use std::fmt;

/// The DP kernel an algorithm runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KernelKind {
    /// Bit-parallel unit edit distance
    EditDistance,
    /// The affine recursion over the full matrix, one pair at a time
    Scalar,
    /// The affine recursion restricted to a band, one pair at a time
    ScalarBanded,
    /// The affine recursion over lane vectors, one pair per lane
    Vectorised,
}

impl fmt::Display for KernelKind {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            KernelKind::EditDistance => "edit distance",
            KernelKind::Scalar => "scalar",
            KernelKind::ScalarBanded => "banded scalar",
            KernelKind::Vectorised => "vectorised",
        };
        write!(f, "{name}")
    }
}

/// A configuration with every default filled in and every setting checked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedConfig {
    pub method:       Method,
    pub gap_cost:     GapCost,
    pub scoring:      ScoringScheme,
    pub band:         Option<Band>,
    pub max_errors:   Option<usize>,
    pub score_type:   ScoreType,
    pub vectorised:   bool,
    pub thread_count: Option<usize>,
}

/// Properties of a configured algorithm that the executor and callers may
/// inspect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlgorithmTraits {
    pub kernel:       KernelKind,
    pub score_type:   ScoreType,
    pub traceback:    bool,
    /// The number of pairs the algorithm processes together
    pub chunk_size:   usize,
    pub thread_count: Option<usize>,
}

/// Checks the pairs of a batch against the configured algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PairValidator {
    alphabet_size: Option<usize>,
    max_rank:      Option<u8>,
    band:          Option<Band>,
    method:        Method,
}

impl PairValidator {
    pub(crate) fn validate(&self, pair: &IndexedPair<'_>) -> Result<(), InputError> {
        let ranks = pair.first.iter().chain(pair.second).copied();
        if let Some(alphabet_size) = self.alphabet_size
            && let Some(rank) = ranks.clone().find(|&r| usize::from(r) >= alphabet_size)
        {
            return Err(InputError::RankOutOfRange {
                pair: pair.index,
                rank,
                alphabet_size,
            });
        }
        if let Some(max_rank) = self.max_rank
            && let Some(rank) = ranks.clone().find(|&r| r > max_rank)
        {
            return Err(InputError::RankNotPackable { pair: pair.index, rank });
        }

        if let Some(band) = self.band {
            self.validate_band(band, pair)?;
        }
        Ok(())
    }

    fn validate_band(&self, band: Band, pair: &IndexedPair<'_>) -> Result<(), InputError> {
        let (len1, len2) = (pair.first.len(), pair.second.len());
        let Some(mapping) = BandMapping::new(band, len1, len2) else {
            return Err(InputError::BandOutsideMatrix { pair: pair.index });
        };
        let Method::Global(free) = self.method else {
            return Ok(());
        };

        if (band.lower > 0 && !free.sequence1_leading) || (band.upper < 0 && !free.sequence2_leading) {
            return Err(InputError::BandExcludesOrigin { pair: pair.index });
        }

        if !band_reaches_end(&mapping, free, len1, len2) {
            return Err(InputError::BandExcludesSink { pair: pair.index });
        }
        Ok(())
    }
}

/// Whether some cell the global alignment may end in lies inside the band.
fn band_reaches_end(mapping: &BandMapping, free: FreeEndGaps, len1: usize, len2: usize) -> bool {
    mapping.contains(MatrixCoordinate::new(len2, len1))
        || (free.sequence1_trailing && !mapping.row_columns(len2).is_empty())
        || (free.sequence2_trailing && !mapping.column_rows(len1).is_empty())
}

type RunChunk<O> = dyn Fn(&[IndexedPair<'_>], &mut dyn FnMut(AlignmentResult<O>)) + Send + Sync;

/// A configured kernel, ready to align chunks of pairs.
pub struct AlignmentAlgorithm<O: OutputSelection> {
    run:       Box<RunChunk<O>>,
    validator: PairValidator,
    traits:    AlgorithmTraits,
}

impl<O: OutputSelection> AlignmentAlgorithm<O> {
    /// Aligns a chunk of at most [`AlgorithmTraits::chunk_size`] pairs and
    /// passes the results to `sink` in the order of the chunk.
    #[inline]
    pub fn run(&self, chunk: &[IndexedPair<'_>], sink: &mut dyn FnMut(AlignmentResult<O>)) {
        debug_assert!(chunk.len() <= self.traits.chunk_size);
        (self.run)(chunk, sink);
    }

    /// Checks that `pair` can be aligned by this algorithm.
    ///
    /// ## Errors
    ///
    /// Ranks must be within the alphabet of the scoring scheme and packable
    /// next to padding symbols, and a band must admit an alignment.
    #[inline]
    pub fn validate(&self, pair: &IndexedPair<'_>) -> Result<(), InputError> {
        self.validator.validate(pair)
    }

    #[inline]
    #[must_use]
    pub fn traits(&self) -> &AlgorithmTraits {
        &self.traits
    }
}

impl<O: OutputSelection> fmt::Debug for AlignmentAlgorithm<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignmentAlgorithm")
            .field("traits", &self.traits)
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

/// The outcome of configuration.
#[derive(Debug)]
pub struct Configured<O: OutputSelection, D> {
    pub algorithm: AlignmentAlgorithm<O>,
    pub config:    NormalizedConfig,
    pub delivery:  D,
}

/// Chooses the kernel for a normalized configuration.
///
/// | condition                                                         | kernel         |
/// |-------------------------------------------------------------------|----------------|
/// | unit edit distance, global or sequence 1 free, score and end only | `EditDistance` |
/// | vectorised                                                        | `Vectorised`   |
/// | banded                                                            | `ScalarBanded` |
/// | otherwise                                                         | `Scalar`       |
#[must_use]
pub fn select_kernel(config: &NormalizedConfig, outputs: OutputFlags) -> KernelKind {
    let edit_distance_method = matches!(
        config.method,
        Method::Global(free) if free == FreeEndGaps::NONE || free == FreeEndGaps::SEQUENCE1_FREE
    );

    if config.scoring.is_edit_distance()
        && config.gap_cost == GapCost::EDIT
        && edit_distance_method
        && config.band.is_none()
        && !config.vectorised
        && !outputs.needs_traceback()
    {
        KernelKind::EditDistance
    } else if config.vectorised {
        KernelKind::Vectorised
    } else if config.band.is_some() {
        KernelKind::ScalarBanded
    } else {
        KernelKind::Scalar
    }
}

/// Fills in defaults and checks that the settings fit together.
///
/// ## Errors
///
/// See [`ConfigError`] for the rejected configurations.
pub fn normalize<O: OutputSelection, D>(config: &AlignConfig<O, D>) -> Result<NormalizedConfig, ConfigError> {
    let scoring = config.scoring.clone().ok_or(ConfigError::MissingScoringScheme)?;

    let gap_cost = config.gap_cost.unwrap_or_default();
    if gap_cost.open > 0 || gap_cost.extend > 0 {
        return Err(ConfigError::PositiveGapCost {
            open:   gap_cost.open,
            extend: gap_cost.extend,
        });
    }

    if let Some(band) = config.band {
        if band.lower > band.upper {
            return Err(ConfigError::DegenerateBand {
                lower: band.lower,
                upper: band.upper,
            });
        }
        if config.vectorised {
            return Err(ConfigError::UnsupportedBand("vectorised alignments are computed without a band"));
        }
    }

    if config.max_errors.is_some() {
        if !scoring.is_edit_distance() || gap_cost != GapCost::EDIT {
            return Err(ConfigError::UnsupportedMaxErrors("errors are only counted under the unit edit distance"));
        }
        if config.method.is_local() {
            return Err(ConfigError::UnsupportedMaxErrors("local alignments are not bounded by errors"));
        }
        if config.vectorised {
            return Err(ConfigError::UnsupportedMaxErrors("vectorised alignments are computed without an error bound"));
        }
    }

    let thread_count = match config.parallel {
        Some(parallel) => match parallel.thread_count {
            None => return Err(ConfigError::MissingThreadCount),
            Some(0) => return Err(ConfigError::ZeroThreadCount),
            Some(threads) => Some(threads),
        },
        None => None,
    };

    Ok(NormalizedConfig {
        method: config.method,
        gap_cost,
        scoring,
        band: config.band,
        max_errors: config.max_errors,
        score_type: config.score_type.unwrap_or_default(),
        vectorised: config.vectorised,
        thread_count,
    })
}

/// Consumes a configuration and builds its algorithm.
///
/// ## Errors
///
/// Fails if the configuration is incomplete or inconsistent, or if a score
/// cannot be represented by the score type.
pub fn configure<O: OutputSelection, D>(config: AlignConfig<O, D>) -> Result<Configured<O, D>, ConfigError> {
    let normalized = normalize(&config)?;
    let kernel = select_kernel(&normalized, O::FLAGS);
    debug!(
        "Configured the {kernel} kernel with {} scores for {:?}",
        normalized.score_type, normalized.method
    );

    let algorithm = match normalized.score_type {
        ScoreType::I8 => build::<i8, 32, O>(&normalized, kernel)?,
        ScoreType::I16 => build::<i16, 16, O>(&normalized, kernel)?,
        ScoreType::I32 => build::<i32, 8, O>(&normalized, kernel)?,
        ScoreType::I64 => build::<i64, 4, O>(&normalized, kernel)?,
    };

    Ok(Configured {
        algorithm,
        config: normalized,
        delivery: config.delivery,
    })
}

fn build<T, const N: usize, O>(config: &NormalizedConfig, kernel: KernelKind) -> Result<AlignmentAlgorithm<O>, ConfigError>
where
    T: ScoreInt + DpScore<Scalar = T, Trace = TraceDirections>,
    O: OutputSelection, {
    debug_assert_eq!(N, lanes_for::<T>());

    let mut validator = PairValidator {
        alphabet_size: config.scoring.alphabet_size(),
        max_rank:      None,
        band:          config.band,
        method:        config.method,
    };
    let chunk_size = if kernel == KernelKind::Vectorised { N } else { 1 };
    let traits = AlgorithmTraits {
        kernel,
        score_type: config.score_type,
        traceback: O::FLAGS.needs_traceback(),
        chunk_size,
        thread_count: config.thread_count,
    };

    let run: Box<RunChunk<O>> = match kernel {
        KernelKind::EditDistance => {
            let aligner = EditDistanceAligner {
                semi_global: config.method != Method::Global(FreeEndGaps::NONE),
                max_errors:  config.max_errors,
                outputs:     O::FLAGS,
                floor:       T::MIN.widen(),
            };
            per_pair(move |pair| aligner.align(pair))
        }
        KernelKind::Scalar | KernelKind::ScalarBanded => {
            let recursion = recursion::<T>(config)?;
            let rule = TrackingRule::new(config.method);
            let min_score = config.max_errors.map(|k| i64::try_from(k).map_or(i64::MIN, |k| -k));
            match &config.scoring {
                ScoringScheme::MatchMismatch {
                    match_score,
                    mismatch_score,
                } => {
                    let aligner = ScalarAligner {
                        recursion,
                        profile: ScalarMatchMismatch::<T>::new(*match_score, *mismatch_score, config.score_type)?,
                        rule,
                        band: config.band,
                        min_score,
                        outputs: O::FLAGS,
                    };
                    per_pair(move |pair| aligner.align(pair))
                }
                ScoringScheme::Matrix(matrix) => {
                    let aligner = ScalarAligner {
                        recursion,
                        profile: ScalarMatrix::<T>::new(matrix, config.score_type)?,
                        rule,
                        band: config.band,
                        min_score,
                        outputs: O::FLAGS,
                    };
                    per_pair(move |pair| aligner.align(pair))
                }
            }
        }
        KernelKind::Vectorised => {
            let local = config.method.is_local();
            match &config.scoring {
                ScoringScheme::MatchMismatch {
                    match_score,
                    mismatch_score,
                } => {
                    let profile = SimdMatchMismatch::<T, N>::new(*match_score, *mismatch_score, local, config.score_type)?;
                    validator.max_rank = Some(max_packable_rank(&profile));
                    per_batch(simd_aligner(config, profile, O::FLAGS)?)
                }
                ScoringScheme::Matrix(matrix) => {
                    let profile = SimdMatrix::<T, N>::new(matrix, local, config.score_type)?;
                    per_batch(simd_aligner(config, profile, O::FLAGS)?)
                }
            }
        }
    };

    Ok(AlignmentAlgorithm { run, validator, traits })
}

/// The affine recursion for the gap costs and method of `config`.
fn recursion<S: DpScore>(config: &NormalizedConfig) -> Result<AffineGapRecursion<S>, ConfigError>
where
    S::Scalar: ScoreInt, {
    let gap = config.gap_cost;
    let open = convert_score(i64::from(gap.open) + i64::from(gap.extend), config.score_type)?;
    let extend = convert_score(i64::from(gap.extend), config.score_type)?;
    let free = config.method.free_end_gaps();
    Ok(AffineGapRecursion::new(
        open,
        extend,
        free.sequence1_leading,
        free.sequence2_leading,
        config.method.is_local(),
    ))
}

fn simd_aligner<T, const N: usize, P>(
    config: &NormalizedConfig, profile: P, outputs: OutputFlags,
) -> Result<SimdAligner<T, N, P>, ConfigError>
where
    T: ScoreInt,
    P: SimdScoringProfile<T, N>, {
    Ok(SimdAligner {
        recursion: recursion::<Lanes<T, N>>(config)?,
        profile,
        rule: TrackingRule::new(config.method),
        outputs,
    })
}

/// The largest rank that `profile` packs without colliding with padding.
fn max_packable_rank<T: ScoreInt, const N: usize, P: SimdScoringProfile<T, N>>(profile: &P) -> u8 {
    (0..=u8::MAX).take_while(|&rank| profile.pack(rank).is_some()).last().unwrap_or(0)
}

fn per_pair<O, F>(align: F) -> Box<RunChunk<O>>
where
    O: OutputSelection,
    F: Fn(&IndexedPair<'_>) -> ResultData + Send + Sync + 'static, {
    Box::new(move |chunk: &[IndexedPair<'_>], sink: &mut dyn FnMut(AlignmentResult<O>)| {
        for pair in chunk {
            sink(AlignmentResult::new(align(pair)));
        }
    })
}

fn per_batch<T, const N: usize, P, O>(aligner: SimdAligner<T, N, P>) -> Box<RunChunk<O>>
where
    T: ScoreInt,
    P: SimdScoringProfile<T, N> + 'static,
    O: OutputSelection, {
    Box::new(move |chunk: &[IndexedPair<'_>], sink: &mut dyn FnMut(AlignmentResult<O>)| {
        for data in aligner.align_batch(chunk) {
            sink(AlignmentResult::new(data));
        }
    })
}
