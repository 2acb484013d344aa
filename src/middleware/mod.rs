/*
 * Responsibility
 * - middleware の公開インターフェース
 * - http: 全ルート共通 (request id / trace / limit / timeout / panic)
 * - cors: ブラウザ向け CORS
 * - auth: 認証必須ルート用
 */
pub mod auth;
pub mod cors;
pub mod http;
