/// Exit status for an error, for command-line tools built on the crate.
///
/// The default is `1`. [`AlignmentError`] reports `2` for configuration
/// errors, which are mistakes of the caller rather than of the input.
///
/// [`AlignmentError`]: crate::alignment::AlignmentError
pub trait GetCode {
    fn get_code(&self) -> i32 {
        1
    }
}
