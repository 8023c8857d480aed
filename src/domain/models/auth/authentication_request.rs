use crate::domain::token::TokenFailure;

/// 인증 모드를 정의하는 열거형
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    /// 인증이 반드시 필요함 (유효하지 않은 세션은 거부)
    Required,
    /// 인증이 선택사항임 (유효하지 않은 세션은 익명으로 취급)
    Optional,
}

/// 요청의 세션 쿠키를 해석한 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionResolution {
    /// 유효한 세션. 토큰의 subject(사용자 ID)를 담습니다.
    Authenticated(String),
    /// 세션 쿠키 없음
    Anonymous,
    /// 쿠키는 있지만 토큰 검증 실패
    Invalid(TokenFailure),
}
