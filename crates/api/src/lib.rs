// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

mod auth;
mod error;
mod handlers;
mod request_response;
mod validation;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedUser, AuthenticationService, Role};
pub use error::{ApiError, AuthError, translate_persistence_error};
pub use handlers::{
    create_case, create_client, delete_case, get_case, get_case_history, list_cases,
    list_clients, list_statuses, login, logout, update_case, whoami,
};
pub use request_response::{
    AgentInfo, CaseDetailResponse, CaseListResponse, CaseSummaryResponse, ClientResponse,
    CreateCaseRequest, CreateClientRequest, HistoryEntryResponse, InsuranceCompanyInfo,
    ListCasesQuery, LoginRequest, LoginResponse, PaginationInfo, StatusInfo,
    UpdateCaseRequest, UserInfo,
};
pub use validation::ValidationError;
