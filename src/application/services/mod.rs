pub mod assignment_service;
pub mod feature_service;
pub mod policy;
pub mod submission_service;
pub mod token_service;

pub use assignment_service::AssignmentService;
pub use feature_service::FeatureService;
pub use policy::{AccessPolicyKind, OpenAccessPolicy, SessionAccessPolicy, UpsertPolicy};
pub use submission_service::SubmissionService;
pub use token_service::{TokenService, TOKEN_COOKIE, TOKEN_TTL_DAYS};
