//! # Configuration Module
//!
//! 토큰 브로커의 설정 관리를 담당하는 모듈입니다.
//! 환경 변수 기반의 설정값을 읽어 명시적인 설정 구조체로 만들고,
//! 이를 생성자 주입으로 서비스에 전달합니다. 전역 가변 상태는 두지 않습니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - Redis 연결, 저장소 타임아웃, `.env` 프로파일 로딩
//! - [`token_config`] - 용도별 서명 시크릿/TTL, 발급자/대상
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! # 발급자/대상 (슬러그로 변환되어 iss, aud 클레임에 사용)
//! export PROJECT_NAME="My Project"
//!
//! # 용도별 시크릿과 만료 시간(초)
//! export ACCESS_TOKEN_SECRET="..."
//! export ACCESS_TOKEN_EXPIRY="3600"
//! export REFRESH_TOKEN_SECRET="..."
//! export REFRESH_TOKEN_EXPIRY="604800"
//! export RESET_PASSWORD_TOKEN_SECRET="..."
//! export RESET_PASSWORD_TOKEN_EXPIRY="1800"
//!
//! # 토큰 저장소
//! export REDIS_URL="redis://localhost:6379"
//! export REDIS_OPERATION_TIMEOUT_MS="300"
//! ```
//!
//! 누락된 용도 설정은 로드 시점이 아니라 해당 용도를 처음 사용하는 호출에서
//! `TokenError::ConfigMissing`으로 보고됩니다.

pub mod data_config;
pub mod token_config;

pub use data_config::*;
pub use token_config::*;
