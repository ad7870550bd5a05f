//! Audit event types.
//!
//! This module provides the [`AuditType`] enum, the closed set of event types
//! the Data API records in its audit log.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::clients::UsageError;

/// Audit event type recorded by the Data API.
///
/// # Example
///
/// ```rust
/// use dm_api_client::AuditType;
///
/// let audit_type: AuditType = "update_service".parse().unwrap();
/// assert_eq!(audit_type, AuditType::UpdateService);
/// assert_eq!(audit_type.to_string(), "update_service");
///
/// assert!(AuditType::is_valid("create_brief"));
/// assert!(!AuditType::is_valid("not_a_type"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditType {
    // User accounts
    /// A user account was created.
    CreateUser,
    /// A user account was updated.
    UpdateUser,
    /// A user was invited.
    InviteUser,
    /// A login attempt failed.
    UserAuthFailed,
    /// Contact details were updated.
    ContactUpdate,
    /// Supplier details were updated.
    SupplierUpdate,

    // Draft services
    /// A draft service was created.
    CreateDraftService,
    /// A draft service was updated.
    UpdateDraftService,
    /// A draft service's status changed.
    UpdateDraftServiceStatus,
    /// A draft service was marked complete.
    CompleteDraftService,
    /// A draft service was published.
    PublishDraftService,
    /// A draft service was deleted.
    DeleteDraftService,

    // Live services
    /// A live service was updated.
    UpdateService,
    /// A service was imported.
    ImportService,
    /// A live service's status changed.
    UpdateServiceStatus,

    // Briefs
    /// A brief was created.
    CreateBrief,
    /// A brief was updated.
    UpdateBrief,
    /// A brief's status changed.
    UpdateBriefStatus,
    /// A brief response was created.
    CreateBriefResponse,
    /// A brief response was updated.
    UpdateBriefResponse,
    /// A brief response was submitted.
    SubmitBriefResponse,
    /// A clarification question was published on a brief.
    AddBriefClarificationQuestion,
    /// A brief was deleted.
    DeleteBrief,
    /// A brief was moved to another framework.
    UpdateBriefFrameworkId,

    // Supplier actions
    /// A supplier registered interest in a framework.
    RegisterFrameworkInterest,
    /// A supplier viewed clarification questions.
    ViewClarificationQuestions,
    /// A supplier sent a clarification question.
    SendClarificationQuestion,
    /// A supplier sent an application question.
    SendApplicationQuestion,
    /// A supplier answered selection questions.
    AnswerSelectionQuestions,
    /// A supplier agreed a framework variation.
    AgreeFrameworkVariation,

    // Framework agreements
    /// An agreement was created.
    CreateAgreement,
    /// An agreement was updated.
    UpdateAgreement,
    /// A signed agreement was uploaded.
    UploadSignedAgreement,
    /// An agreement was signed.
    SignAgreement,
    /// A countersigned agreement was uploaded.
    UploadCountersignedAgreement,
    /// An agreement was countersigned.
    CountersignAgreement,
    /// A countersigned agreement was deleted.
    DeleteCountersignedAgreement,

    // Frameworks
    /// A framework was created.
    CreateFramework,
    /// A framework was updated.
    FrameworkUpdate,
    /// Framework statistics were snapshotted.
    SnapshotFrameworkStats,

    // Projects
    /// A direct award project was created.
    CreateProject,
    /// A search was saved to a direct award project.
    CreateProjectSearch,
}

impl AuditType {
    /// Every audit type, in declaration order.
    pub const ALL: [Self; 42] = [
        Self::CreateUser,
        Self::UpdateUser,
        Self::InviteUser,
        Self::UserAuthFailed,
        Self::ContactUpdate,
        Self::SupplierUpdate,
        Self::CreateDraftService,
        Self::UpdateDraftService,
        Self::UpdateDraftServiceStatus,
        Self::CompleteDraftService,
        Self::PublishDraftService,
        Self::DeleteDraftService,
        Self::UpdateService,
        Self::ImportService,
        Self::UpdateServiceStatus,
        Self::CreateBrief,
        Self::UpdateBrief,
        Self::UpdateBriefStatus,
        Self::CreateBriefResponse,
        Self::UpdateBriefResponse,
        Self::SubmitBriefResponse,
        Self::AddBriefClarificationQuestion,
        Self::DeleteBrief,
        Self::UpdateBriefFrameworkId,
        Self::RegisterFrameworkInterest,
        Self::ViewClarificationQuestions,
        Self::SendClarificationQuestion,
        Self::SendApplicationQuestion,
        Self::AnswerSelectionQuestions,
        Self::AgreeFrameworkVariation,
        Self::CreateAgreement,
        Self::UpdateAgreement,
        Self::UploadSignedAgreement,
        Self::SignAgreement,
        Self::UploadCountersignedAgreement,
        Self::CountersignAgreement,
        Self::DeleteCountersignedAgreement,
        Self::CreateFramework,
        Self::FrameworkUpdate,
        Self::SnapshotFrameworkStats,
        Self::CreateProject,
        Self::CreateProjectSearch,
    ];

    /// Returns the wire value of this audit type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::InviteUser => "invite_user",
            Self::UserAuthFailed => "user_auth_failed",
            Self::ContactUpdate => "contact_update",
            Self::SupplierUpdate => "supplier_update",
            Self::CreateDraftService => "create_draft_service",
            Self::UpdateDraftService => "update_draft_service",
            Self::UpdateDraftServiceStatus => "update_draft_service_status",
            Self::CompleteDraftService => "complete_draft_service",
            Self::PublishDraftService => "publish_draft_service",
            Self::DeleteDraftService => "delete_draft_service",
            Self::UpdateService => "update_service",
            Self::ImportService => "import_service",
            Self::UpdateServiceStatus => "update_service_status",
            Self::CreateBrief => "create_brief",
            Self::UpdateBrief => "update_brief",
            Self::UpdateBriefStatus => "update_brief_status",
            Self::CreateBriefResponse => "create_brief_response",
            Self::UpdateBriefResponse => "update_brief_response",
            Self::SubmitBriefResponse => "submit_brief_response",
            Self::AddBriefClarificationQuestion => "add_brief_clarification_question",
            Self::DeleteBrief => "delete_brief",
            Self::UpdateBriefFrameworkId => "update_brief_framework_id",
            Self::RegisterFrameworkInterest => "register_framework_interest",
            Self::ViewClarificationQuestions => "view_clarification_questions",
            Self::SendClarificationQuestion => "send_clarification_question",
            Self::SendApplicationQuestion => "send_application_question",
            Self::AnswerSelectionQuestions => "answer_selection_questions",
            Self::AgreeFrameworkVariation => "agree_framework_variation",
            Self::CreateAgreement => "create_agreement",
            Self::UpdateAgreement => "update_agreement",
            Self::UploadSignedAgreement => "upload_signed_agreement",
            Self::SignAgreement => "sign_agreement",
            Self::UploadCountersignedAgreement => "upload_countersigned_agreement",
            Self::CountersignAgreement => "countersign_agreement",
            Self::DeleteCountersignedAgreement => "delete_countersigned_agreement",
            Self::CreateFramework => "create_framework",
            Self::FrameworkUpdate => "framework_update",
            Self::SnapshotFrameworkStats => "snapshot_framework_stats",
            Self::CreateProject => "create_project",
            Self::CreateProjectSearch => "create_project_search",
        }
    }

    /// Returns `true` if `value` names a known audit type.
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        value.parse::<Self>().is_ok()
    }
}

impl fmt::Display for AuditType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditType {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|audit_type| audit_type.as_str() == s)
            .ok_or_else(|| UsageError::UnknownAuditType {
                value: s.to_string(),
            })
    }
}

impl AsRef<str> for AuditType {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
