//! 계정/세션 서비스 백엔드
//!
//! 이메일/비밀번호와 OAuth(Google, Discord) 로그인을 제공하고,
//! 서명된 세션 토큰을 HttpOnly 쿠키로 발급합니다.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← /api/auth, /api/health
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ Handlers + Auth │ ← DTO 검증, 세션 쿠키, 리다이렉트
//! │   Middleware    │
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비밀번호, 세션 토큰, OAuth 어댑터, 계정 upsert
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← UserStore / OAuthStateStore
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │
//! └─────────────────┘
//! ```
//!
//! 서비스는 전역 레지스트리 없이 [`core::AppState`]에 모여 `web::Data`로 공유됩니다.
//!
//! ```rust,ignore
//! let config = AppConfig::from_env()?;
//! let data = web::Data::new(AppState::new(config, user_store, state_store)?);
//!
//! HttpServer::new(move || {
//!     App::new()
//!         .app_data(data.clone())
//!         .configure(configure_all_routes)
//! })
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
