use std::str::FromStr;
use itertools::Itertools;
use gauss::Real;
use crate::MatError;
use super::Mat;

// Matrix literals use the Matlab-like notation "1,2,3;3,2,1;5,1,4":
// rows separated by ';', entries by ',', no enclosing brackets.
impl<R> FromStr for Mat<R>
where R: Real + FromStr {
    type Err = MatError;

    fn from_str(s: &str) -> Result<Self, MatError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MatError::InvalidShape("empty matrix literal".into()))
        }
        if s.starts_with('[') {
            return Err(MatError::InvalidValue("matrix literals take no brackets".into()))
        }

        let rows: Vec<Vec<R>> = s.split(';').map(|row|
            row.split(',').map(parse_entry).collect()
        ).try_collect()?;

        Mat::from_rows(rows)
    }
}

fn parse_entry<R>(tok: &str) -> Result<R, MatError>
where R: Real + FromStr {
    tok.trim().parse().map_err(|_|
        MatError::InvalidValue(format!("cannot read {:?} as a number", tok.trim()))
    )
}
