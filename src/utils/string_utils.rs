//! # 문자열 유틸리티
//!
//! 토큰 발급자/대상 슬러그 생성과, 로그에 원본 토큰 대신 남기는 지문 계산을 제공합니다.

use sha2::{Digest, Sha256};

/// 문자열을 URL 슬러그로 변환합니다.
///
/// ASCII 영숫자는 소문자로 유지하고, 그 밖의 연속된 문자는 하나의 `-`로 합칩니다.
/// 앞뒤의 `-`는 제거됩니다.
///
/// # Examples
///
/// ```rust,ignore
/// assert_eq!(slugify("My Project"), "my-project");
/// assert_eq!(slugify("  Hello,  World!! "), "hello-world");
/// ```
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for c in value.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// 로그 출력용 토큰 지문 (SHA-256 앞 12자리)
///
/// 토큰 원문은 자격 증명이므로 로그에 남기지 않습니다.
pub fn token_fingerprint(token: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(token.as_bytes()));
    digest[..12].to_string()
}
