use super::*;
use crate::alignment::{Band, GapSegment, TracebackError, traceback};

fn coordinate(row: usize, col: usize) -> MatrixCoordinate {
    MatrixCoordinate::new(row, col)
}

#[test]
fn band_geometry() {
    let mapping = BandMapping::new(Band::new(-1, 2), 5, 4).unwrap();
    assert_eq!(mapping.band_size(), 4);
    assert_eq!(mapping.column_rows(0), 0..=1);
    assert_eq!(mapping.column_rows(3), 1..=4);
    assert_eq!(mapping.column_rows(5), 3..=4);
    assert!(mapping.column_rows(6).is_empty());
    assert_eq!(mapping.row_columns(4), 3..=5);
    assert_eq!(mapping.row_columns(0), 0..=2);

    assert!(mapping.contains(coordinate(2, 3)));
    assert!(!mapping.contains(coordinate(0, 3)));
    assert!(!mapping.contains(coordinate(4, 2)));
}

#[test]
fn band_storage_round_trip() {
    let mapping = BandMapping::new(Band::new(-2, 1), 6, 5).unwrap();
    let matrix = CoordinateMatrix::banded(mapping);

    let mut seen = Vec::new();
    for cell in matrix.iter() {
        let storage = mapping.to_storage(cell).unwrap();
        assert!(storage.offset < mapping.band_size());
        assert_eq!(mapping.to_matrix(storage), Some(cell));
        seen.push(mapping.linear_index(cell).unwrap());
    }
    let unique = seen.len();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), unique);

    assert_eq!(mapping.to_storage(coordinate(5, 0)), None);
    assert_eq!(mapping.to_matrix(BandCoordinate { col: 0, offset: 3 }), None);
}

#[test]
fn band_outside_matrix() {
    assert_eq!(BandMapping::new(Band::new(6, 7), 5, 4), None);
    assert_eq!(BandMapping::new(Band::new(-9, -5), 5, 4), None);
    assert_eq!(BandMapping::new(Band::new(2, 1), 5, 4), None);
    // A band touching only the corner is still a band
    assert_eq!(BandMapping::new(Band::new(5, 9), 5, 4).map(|m| m.band_size()), Some(1));
}

#[test]
fn wide_band_is_clamped() {
    let mapping = BandMapping::new(Band::new(-100, 100), 3, 2).unwrap();
    assert_eq!(mapping.band_size(), 3);
    let banded = CoordinateMatrix::banded(mapping);
    let full = CoordinateMatrix::new(3, 2);
    assert!(banded.iter().eq(full.iter()));
}

#[test]
fn unbounded_band() {
    let mapping = BandMapping::new(Band::new(isize::MIN, isize::MAX), 4, 3).unwrap();
    assert_eq!(mapping.band_size(), 4);
    assert_eq!(mapping.column_rows(0), 0..=3);
    assert_eq!(mapping.row_columns(3), 0..=4);
    assert!(CoordinateMatrix::banded(mapping).iter().eq(CoordinateMatrix::new(4, 3).iter()));

    let upper_half = BandMapping::new(Band::new(0, isize::MAX), 4, 3).unwrap();
    assert_eq!(upper_half.column_rows(2), 0..=2);
    assert_eq!(upper_half.row_columns(1), 1..=4);
}

#[test]
fn coordinate_matrix_without_band() {
    let matrix = CoordinateMatrix::new(2, 3);
    assert_eq!((matrix.rows(), matrix.cols()), (4, 3));
    assert_eq!(matrix.iter().count(), 12);
    assert_eq!(matrix.iter().nth(5), Some(coordinate(1, 1)));
    assert!(matrix.contains(coordinate(3, 2)));
    assert!(!matrix.contains(coordinate(4, 0)));
}

#[test]
fn direction_names() {
    assert_eq!(format!("{:?}", TraceDirections::NONE), "none");
    assert_eq!(
        format!("{:?}", TraceDirections::DIAGONAL | TraceDirections::UP | TraceDirections::UP_OPEN),
        "diagonal|up_open|up"
    );
    assert!(TraceDirections::LEFT_OPEN.is_terminal());
    assert!(!TraceDirections::LEFT.is_terminal());
}

/// A 3 × 3 matrix whose optimal path from the sink goes left, diagonal and
/// up.
fn small_trace() -> TraceMatrixFull<TraceDirections> {
    let mut trace = TraceMatrixFull::new(3, 3);
    trace.set(coordinate(2, 2), TraceDirections::LEFT | TraceDirections::LEFT_OPEN);
    trace.set(coordinate(2, 1), TraceDirections::DIAGONAL);
    trace.set(coordinate(1, 0), TraceDirections::UP | TraceDirections::UP_OPEN);
    trace
}

#[test]
fn trace_path_steps() {
    let trace = small_trace();
    let steps: Result<Vec<_>, _> = trace_path(&trace, coordinate(2, 2)).unwrap().collect();
    assert_eq!(steps.unwrap(), [TraceStep::Left, TraceStep::Diagonal, TraceStep::Up]);

    let result = traceback(&trace, coordinate(2, 2)).unwrap();
    assert_eq!(result.begin, coordinate(0, 0));
    assert_eq!(result.first_gaps, [GapSegment { position: 0, length: 1 }]);
    assert_eq!(result.second_gaps, [GapSegment { position: 2, length: 1 }]);
}

#[test]
fn vertical_gaps_extend_until_opened() {
    let mut trace = TraceMatrixFull::new(4, 2);
    trace.set(coordinate(3, 1), TraceDirections::UP | TraceDirections::LEFT | TraceDirections::DIAGONAL);
    trace.set(coordinate(2, 1), TraceDirections::DIAGONAL);
    trace.set(coordinate(1, 1), TraceDirections::UP_OPEN);

    let result = traceback(&trace, coordinate(3, 1)).unwrap();
    assert_eq!(result.begin, coordinate(0, 1));
    assert_eq!(result.first_gaps, [GapSegment { position: 1, length: 3 }]);
    assert!(result.second_gaps.is_empty());
}

#[test]
fn traceback_errors() {
    let trace = small_trace();
    assert_eq!(
        traceback(&trace, coordinate(3, 0)),
        Err(TracebackError::CoordinateOutOfBounds { row: 3, col: 0 })
    );
    assert_eq!(traceback(&NoTrace, coordinate(0, 0)), Err(TracebackError::TraceDisabled));

    let banded = TraceMatrixBanded::<TraceDirections>::new(BandMapping::new(Band::new(0, 1), 3, 3).unwrap());
    assert_eq!(
        banded.trace_at(coordinate(2, 0)),
        Err(TracebackError::OutsideBand { row: 2, col: 0 })
    );
    assert_eq!(banded.trace_at(coordinate(1, 2)), Ok(TraceDirections::NONE));
}

#[test]
fn lane_view_reads_one_lane() {
    let mut trace = TraceMatrixFull::<crate::simd::Lanes<u8, 2>>::new(2, 2);
    trace.set(coordinate(1, 1), crate::simd::Lanes([TraceDirections::DIAGONAL.bits(), TraceDirections::UP.bits()]));
    assert_eq!(LaneView::new(&trace, 0).trace_at(coordinate(1, 1)), Ok(TraceDirections::DIAGONAL));
    assert_eq!(LaneView::new(&trace, 1).trace_at(coordinate(1, 1)), Ok(TraceDirections::UP));
}
