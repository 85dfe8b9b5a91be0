//! 토큰 용도(Purpose) 정의
//!
//! 모든 토큰은 정확히 하나의 용도를 위해 발급됩니다.
//! 용도마다 독립된 서명 시크릿과 TTL을 가지며, 용도 자체는 클레임에 포함되지 않고
//! 어떤 시크릿과 캐시 키로 발급/검증했는지에 의해 결정됩니다.
//!
//! | 용도 | 종류 | 캐시 키 예시 |
//! |------|------|--------------|
//! | `access` | Bearer | `access_token_{subject}` |
//! | `refresh` | Bearer | `refresh_token_{subject}` |
//! | `activation` | Action | `activation_token_{subject}` |
//! | `deactivation` | Action | `deactivation_token_{subject}` |
//! | `reactivation` | Action | `reactivation_token_{subject}` |
//! | `deletion` | Action | `deletion_token_{subject}` |
//! | `reset_password` | Action | `reset_password_token_{subject}` |
//! | `change_email` | Action | `change_email_token_{subject}` |
//! | `change_username` | Action | `change_username_token_{subject}` |

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Purpose {
    /// API 접근용 단기 Bearer 토큰
    Access,
    /// 액세스 토큰 재발급용 Bearer 토큰
    Refresh,
    Activation,
    Deactivation,
    Reactivation,
    Deletion,
    ResetPassword,
    ChangeEmail,
    ChangeUsername,
}

impl Purpose {
    pub const ALL: [Purpose; 9] = [
        Purpose::Access,
        Purpose::Refresh,
        Purpose::Activation,
        Purpose::Deactivation,
        Purpose::Reactivation,
        Purpose::Deletion,
        Purpose::ResetPassword,
        Purpose::ChangeEmail,
        Purpose::ChangeUsername,
    ];

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "access" => Ok(Purpose::Access),
            "refresh" => Ok(Purpose::Refresh),
            "activation" => Ok(Purpose::Activation),
            "deactivation" => Ok(Purpose::Deactivation),
            "reactivation" => Ok(Purpose::Reactivation),
            "deletion" => Ok(Purpose::Deletion),
            "reset_password" => Ok(Purpose::ResetPassword),
            "change_email" => Ok(Purpose::ChangeEmail),
            "change_username" => Ok(Purpose::ChangeUsername),
            _ => Err(format!("Unsupported token purpose: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Purpose::Access => "access",
            Purpose::Refresh => "refresh",
            Purpose::Activation => "activation",
            Purpose::Deactivation => "deactivation",
            Purpose::Reactivation => "reactivation",
            Purpose::Deletion => "deletion",
            Purpose::ResetPassword => "reset_password",
            Purpose::ChangeEmail => "change_email",
            Purpose::ChangeUsername => "change_username",
        }
    }

    /// 일회용 액션 토큰인지 여부
    ///
    /// 액션 토큰은 첫 번째 검증 성공 시 저장소에서 삭제(소비)됩니다.
    /// `access`/`refresh`는 대체되거나 폐기될 때까지 반복 사용 가능한 Bearer 토큰입니다.
    pub fn is_action(&self) -> bool {
        !matches!(self, Purpose::Access | Purpose::Refresh)
    }

    /// 환경 변수 접두사 (`RESET_PASSWORD` → `RESET_PASSWORD_TOKEN_SECRET`)
    pub fn env_prefix(&self) -> String {
        self.as_str().to_uppercase()
    }

    /// 저장소 캐시 키: `"{purpose}_token_{subject}"`
    pub fn cache_key(&self, subject: &str) -> String {
        format!("{}_token_{}", self.as_str(), subject)
    }
}

impl fmt::Display for Purpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
