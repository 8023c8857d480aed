//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 문자열 정리, 이메일 정규화/마스킹

pub mod string_utils;
