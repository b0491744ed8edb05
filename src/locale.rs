//! 소수점 표기 변환 모듈

use clap::ValueEnum;
use std::borrow::Cow;

/// 출력 값의 소수점 표기
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum DecimalMark {
    /// 점을 쉼표로 바꿈 (예: 1.5 → 1,5)
    #[default]
    Comma,
    /// 원본 그대로 유지
    Point,
}

impl DecimalMark {
    /// 표기 설정에 따라 값을 변환
    ///
    /// 원시 바이트에 적용하며 `.` 외의 바이트는 건드리지 않습니다.
    /// 바꿀 것이 없으면 빌린 값을 그대로 돌려줍니다.
    pub fn apply(self, field: &[u8]) -> Cow<'_, [u8]> {
        match self {
            DecimalMark::Comma if field.contains(&b'.') => Cow::Owned(
                field
                    .iter()
                    .map(|&b| if b == b'.' { b',' } else { b })
                    .collect(),
            ),
            _ => Cow::Borrowed(field),
        }
    }

    /// 쉼표 소수점 사용 여부
    pub fn use_comma(self) -> bool {
        self == DecimalMark::Comma
    }
}

impl std::fmt::Display for DecimalMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecimalMark::Comma => write!(f, ", (쉼표)"),
            DecimalMark::Point => write!(f, ". (점)"),
        }
    }
}

/// 모든 ASCII `.`를 `,`로 치환
///
/// 숫자인지 검사하지 않고 원시 텍스트에 그대로 적용합니다.
///
/// # Examples
/// ```
/// use vextract::locale::to_comma_decimal;
///
/// assert_eq!(to_comma_decimal("3.14"), "3,14");
/// assert_eq!(to_comma_decimal("1.2.3"), "1,2,3");
/// ```
pub fn to_comma_decimal(field: &str) -> String {
    field.replace('.', ",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_comma_decimal_replaces_all() {
        assert_eq!(to_comma_decimal("0.001"), "0,001");
        assert_eq!(to_comma_decimal("1.000.000.5"), "1,000,000,5");
        assert_eq!(to_comma_decimal("..."), ",,,");
    }

    #[test]
    fn test_to_comma_decimal_no_dot() {
        assert_eq!(to_comma_decimal(""), "");
        assert_eq!(to_comma_decimal("42"), "42");
        assert_eq!(to_comma_decimal("n/a"), "n/a");
    }

    #[test]
    fn test_to_comma_decimal_repeat_is_noop() {
        let once = to_comma_decimal("12.5e-3");
        assert_eq!(to_comma_decimal(&once), once);
    }

    #[test]
    fn test_decimal_mark_apply() {
        assert_eq!(&*DecimalMark::Comma.apply(b"2.5"), b"2,5");
        assert_eq!(&*DecimalMark::Point.apply(b"2.5"), b"2.5");
        assert!(DecimalMark::Comma.use_comma());
        assert!(!DecimalMark::Point.use_comma());
    }

    #[test]
    fn test_decimal_mark_apply_keeps_other_bytes() {
        assert_eq!(&*DecimalMark::Comma.apply(b"5.\xb5g"), b"5,\xb5g");
        assert!(matches!(DecimalMark::Comma.apply(b"42"), Cow::Borrowed(_)));
        assert_eq!(
            &*DecimalMark::Comma.apply("21.5도".as_bytes()),
            to_comma_decimal("21.5도").as_bytes()
        );
    }
}
