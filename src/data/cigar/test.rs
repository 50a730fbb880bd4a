use super::*;

#[test]
fn parse_every_operation() {
    let cigar: Cigar = "  1M22I333D4444N55555S6666H777P88X9=  ".parse().unwrap();
    let ops: Vec<_> = cigar.iter().map(|c| (c.inc, c.op)).collect();
    assert_eq!(
        ops,
        [
            (1, b'M'),
            (22, b'I'),
            (333, b'D'),
            (4444, b'N'),
            (55555, b'S'),
            (6666, b'H'),
            (777, b'P'),
            (88, b'X'),
            (9, b'='),
        ]
    );
    assert_eq!(cigar.len(), 9);
    assert_eq!(cigar.to_string(), "1M22I333D4444N55555S6666H777P88X9=");
}

#[test]
fn parse_errors() {
    assert_eq!(Cigar::try_from("10M2I").map(|c| c.len()), Ok(2));
    assert_eq!(Cigar::try_from("M"), Err(CigarParseError::MissingLength(b'M')));
    assert_eq!(Cigar::try_from("0M"), Err(CigarParseError::ZeroLength(b'M')));
    assert_eq!(Cigar::try_from("5"), Err(CigarParseError::MissingOperation));
    assert_eq!(Cigar::try_from("5Q"), Err(CigarParseError::UnknownOperation(b'Q')));
    assert_eq!(
        Cigar::try_from("100000000000000000000000000000155M"),
        Err(CigarParseError::LengthOverflow)
    );
}

#[test]
fn empty_cigar_is_a_star() {
    assert_eq!(Cigar::new().to_string(), "*");
    assert_eq!(Cigar::try_from("*"), Ok(Cigar::new()));
    assert!(Cigar::try_from(" * ").unwrap().is_empty());
}

#[test]
fn condense() {
    let cigar = Cigar::from_ciglets([
        Ciglet { inc: 3, op: b'M' },
        Ciglet { inc: 2, op: b'M' },
        Ciglet { inc: 0, op: b'I' },
        Ciglet { inc: 1, op: b'D' },
        Ciglet { inc: 12, op: b'M' },
        Ciglet { inc: 4, op: b'S' },
    ]);
    assert_eq!(cigar.to_string(), "5M1D12M4S");
    assert_eq!(cigar.reference_length(), 18);
    assert_eq!(cigar.query_length(), 21);
    assert_eq!(Cigar::try_from("2M3M").map(|c| c.to_string()), Ok("5M".to_string()));
}
