//! 줄 분류 모듈
//!
//! 한 줄이 설정된 값 접두사로 시작하는지 판별하고, 접두사 뒤의 값을 잘라냅니다.
//! 비교는 바이트 단위이며 대소문자를 구분하고 공백을 제거하지 않습니다.
//! 줄은 디코딩하지 않은 바이트 그대로 다루므로 UTF-8이 아닌 입력도 손상되지 않습니다.

use crate::error::{ExtractError, Result};

/// `line`이 `prefix`로 시작하는지 확인
///
/// `line`이 `prefix`보다 짧으면 항상 `false`입니다.
///
/// # Examples
/// ```
/// use vextract::classifier::matches;
///
/// assert!(matches(b"A:1", b"A:"));
/// assert!(!matches(b"A", b"A:"));
/// assert!(!matches(b"a:1", b"A:"));
/// ```
pub fn matches(line: &[u8], prefix: &[u8]) -> bool {
    line.starts_with(prefix)
}

/// 접두사 뒤에 남은 값을 반환
///
/// 일치하지 않으면 `None`, 접두사만 있는 줄이면 빈 슬라이스를 반환합니다.
pub fn extract_field<'a>(line: &'a [u8], prefix: &[u8]) -> Option<&'a [u8]> {
    line.strip_prefix(prefix)
}

/// 컴파일된 접두사 매처
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMatcher {
    prefix: String,
}

impl PrefixMatcher {
    /// 새 접두사 매처 생성
    ///
    /// # Arguments
    /// * `prefix` - 값이 들어 있는 줄을 식별하는 접두사 (비어 있으면 에러)
    ///
    /// # Examples
    /// ```
    /// use vextract::classifier::PrefixMatcher;
    ///
    /// let matcher = PrefixMatcher::new("X=").unwrap();
    /// assert_eq!(matcher.extract(b"X=1.5"), Some(&b"1.5"[..]));
    /// assert_eq!(matcher.extract(b"Y=1.5"), None);
    /// ```
    pub fn new(prefix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() {
            return Err(ExtractError::invalid("값 접두사가 비어 있습니다"));
        }
        Ok(Self { prefix })
    }

    /// 줄이 접두사와 일치하는지 확인
    pub fn matches(&self, line: &[u8]) -> bool {
        matches(line, self.prefix.as_bytes())
    }

    /// 일치하는 줄에서 값을 추출
    pub fn extract<'a>(&self, line: &'a [u8]) -> Option<&'a [u8]> {
        extract_field(line, self.prefix.as_bytes())
    }
}
