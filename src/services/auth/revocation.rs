//! 폐기 연쇄(Revocation Cascade) 테이블
//!
//! 계정 상태 전이 하나가 어떤 토큰 용도들을 무효화하는지 선언적으로 정의합니다.
//! 흐름마다 삭제 목록을 직접 나열하지 않고 이 테이블 하나를 참조합니다.
//!
//! | 전이 | 확인 토큰 | 폐기 | 후속 발급 |
//! |------|-----------|------|-----------|
//! | logout | - | access, refresh | - |
//! | activate | activation | activation | - |
//! | deactivate | deactivation | deactivation, access, refresh | - |
//! | reactivate | reactivation | reactivation, access, refresh | - |
//! | delete | deletion | deletion, access, refresh | - |
//! | reset_password | reset_password | reset_password, access, refresh | - |
//! | change_email | change_email | change_email, access, refresh | activation |
//! | change_username | change_username | change_username, access, refresh | reactivation |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::token::Purpose;

/// 계정 수명주기 전이
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountTransition {
    Logout,
    Activate,
    Deactivate,
    Reactivate,
    Delete,
    ResetPassword,
    /// 이메일 변경 후 계정은 새 주소로 다시 활성화되어야 함
    ChangeEmail,
    /// 사용자명 변경 후 계정은 재활성화 링크로 다시 활성화되어야 함
    ChangeUsername,
}

/// 전이 하나의 연쇄 규칙
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeRule {
    pub transition: AccountTransition,
    /// 전이를 확인하는 일회용 토큰 용도
    pub action: Option<Purpose>,
    /// 전이 후 삭제되는 용도
    pub revokes: &'static [Purpose],
    /// 전이 후 새로 발급해야 하는 용도
    pub follow_up: Option<Purpose>,
}

const SESSION: &[Purpose] = &[Purpose::Access, Purpose::Refresh];

const LOGOUT: CascadeRule = CascadeRule {
    transition: AccountTransition::Logout,
    action: None,
    revokes: SESSION,
    follow_up: None,
};

const ACTIVATE: CascadeRule = CascadeRule {
    transition: AccountTransition::Activate,
    action: Some(Purpose::Activation),
    revokes: &[Purpose::Activation],
    follow_up: None,
};

const DEACTIVATE: CascadeRule = CascadeRule {
    transition: AccountTransition::Deactivate,
    action: Some(Purpose::Deactivation),
    revokes: &[Purpose::Deactivation, Purpose::Access, Purpose::Refresh],
    follow_up: None,
};

const REACTIVATE: CascadeRule = CascadeRule {
    transition: AccountTransition::Reactivate,
    action: Some(Purpose::Reactivation),
    revokes: &[Purpose::Reactivation, Purpose::Access, Purpose::Refresh],
    follow_up: None,
};

const DELETE: CascadeRule = CascadeRule {
    transition: AccountTransition::Delete,
    action: Some(Purpose::Deletion),
    revokes: &[Purpose::Deletion, Purpose::Access, Purpose::Refresh],
    follow_up: None,
};

const RESET_PASSWORD: CascadeRule = CascadeRule {
    transition: AccountTransition::ResetPassword,
    action: Some(Purpose::ResetPassword),
    revokes: &[Purpose::ResetPassword, Purpose::Access, Purpose::Refresh],
    follow_up: None,
};

const CHANGE_EMAIL: CascadeRule = CascadeRule {
    transition: AccountTransition::ChangeEmail,
    action: Some(Purpose::ChangeEmail),
    revokes: &[Purpose::ChangeEmail, Purpose::Access, Purpose::Refresh],
    follow_up: Some(Purpose::Activation),
};

const CHANGE_USERNAME: CascadeRule = CascadeRule {
    transition: AccountTransition::ChangeUsername,
    action: Some(Purpose::ChangeUsername),
    revokes: &[Purpose::ChangeUsername, Purpose::Access, Purpose::Refresh],
    follow_up: Some(Purpose::Reactivation),
};

pub const REVOCATION_CASCADE: &[CascadeRule] = &[
    LOGOUT,
    ACTIVATE,
    DEACTIVATE,
    REACTIVATE,
    DELETE,
    RESET_PASSWORD,
    CHANGE_EMAIL,
    CHANGE_USERNAME,
];

impl AccountTransition {
    pub const ALL: [AccountTransition; 8] = [
        AccountTransition::Logout,
        AccountTransition::Activate,
        AccountTransition::Deactivate,
        AccountTransition::Reactivate,
        AccountTransition::Delete,
        AccountTransition::ResetPassword,
        AccountTransition::ChangeEmail,
        AccountTransition::ChangeUsername,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTransition::Logout => "logout",
            AccountTransition::Activate => "activate",
            AccountTransition::Deactivate => "deactivate",
            AccountTransition::Reactivate => "reactivate",
            AccountTransition::Delete => "delete",
            AccountTransition::ResetPassword => "reset_password",
            AccountTransition::ChangeEmail => "change_email",
            AccountTransition::ChangeUsername => "change_username",
        }
    }

    pub fn rule(&self) -> &'static CascadeRule {
        match self {
            AccountTransition::Logout => &LOGOUT,
            AccountTransition::Activate => &ACTIVATE,
            AccountTransition::Deactivate => &DEACTIVATE,
            AccountTransition::Reactivate => &REACTIVATE,
            AccountTransition::Delete => &DELETE,
            AccountTransition::ResetPassword => &RESET_PASSWORD,
            AccountTransition::ChangeEmail => &CHANGE_EMAIL,
            AccountTransition::ChangeUsername => &CHANGE_USERNAME,
        }
    }

    pub fn action_purpose(&self) -> Option<Purpose> {
        self.rule().action
    }

    pub fn revoked_purposes(&self) -> &'static [Purpose] {
        self.rule().revokes
    }

    pub fn follow_up(&self) -> Option<Purpose> {
        self.rule().follow_up
    }
}

impl fmt::Display for AccountTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 여러 전이가 폐기하는 용도의 합집합 (입력 순서 유지, 중복 제거)
pub fn purposes_revoked_by(transitions: &[AccountTransition]) -> Vec<Purpose> {
    let mut purposes = Vec::new();
    for transition in transitions {
        for purpose in transition.revoked_purposes() {
            if !purposes.contains(purpose) {
                purposes.push(*purpose);
            }
        }
    }
    purposes
}
