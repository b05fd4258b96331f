//! Who may do what.
//!
//! Every rank gets self-service (own dashboard, submitting and listing own
//! requests). Deciding is reserved for the manager of record of the requesting
//! employee; admins can see everything but decide nothing.

use crate::error::AppError;
use crate::model::rank::Rank;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ViewOwnDashboard,
    SubmitRequest,
    ViewOwnRequests,
    ViewManagerDashboard,
    /// Rank-level gate checked before the request is looked up.
    DecideRequests,
    /// Decide one request whose owner reports to `owner_manager_id`.
    DecideRequestOf { owner_manager_id: Option<i64> },
    ViewAdminDashboard,
}

/// The parts of the current actor the policy looks at.
#[derive(Debug, Clone, Copy)]
pub struct Subject {
    pub employee_id: i64,
    pub rank: Rank,
}

pub fn is_allowed(subject: Subject, action: Action) -> bool {
    match action {
        Action::ViewOwnDashboard | Action::SubmitRequest | Action::ViewOwnRequests => true,
        Action::ViewManagerDashboard | Action::DecideRequests => subject.rank == Rank::Manager,
        Action::DecideRequestOf { owner_manager_id } => {
            subject.rank == Rank::Manager && owner_manager_id == Some(subject.employee_id)
        }
        Action::ViewAdminDashboard => subject.rank == Rank::Admin,
    }
}

pub fn authorize(subject: Subject, action: Action) -> Result<(), AppError> {
    if is_allowed(subject, action) {
        Ok(())
    } else {
        tracing::info!(
            employee_id = subject.employee_id,
            rank = %subject.rank,
            ?action,
            "Access restricted"
        );
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPLOYEE: Subject = Subject { employee_id: 3, rank: Rank::Employee };
    const MANAGER: Subject = Subject { employee_id: 2, rank: Rank::Manager };
    const ADMIN: Subject = Subject { employee_id: 1, rank: Rank::Admin };

    #[test]
    fn self_service_is_open_to_every_rank() {
        for subject in [EMPLOYEE, MANAGER, ADMIN] {
            assert!(is_allowed(subject, Action::ViewOwnDashboard));
            assert!(is_allowed(subject, Action::SubmitRequest));
            assert!(is_allowed(subject, Action::ViewOwnRequests));
        }
    }

    #[test]
    fn only_managers_see_the_manager_dashboard() {
        assert!(is_allowed(MANAGER, Action::ViewManagerDashboard));
        assert!(!is_allowed(EMPLOYEE, Action::ViewManagerDashboard));
        assert!(!is_allowed(ADMIN, Action::ViewManagerDashboard));
    }

    #[test]
    fn only_admins_see_the_admin_dashboard() {
        assert!(is_allowed(ADMIN, Action::ViewAdminDashboard));
        assert!(!is_allowed(MANAGER, Action::ViewAdminDashboard));
        assert!(!is_allowed(EMPLOYEE, Action::ViewAdminDashboard));
    }

    #[test]
    fn deciding_requires_being_the_manager_of_record() {
        let own_report = Action::DecideRequestOf { owner_manager_id: Some(MANAGER.employee_id) };
        let someone_elses = Action::DecideRequestOf { owner_manager_id: Some(99) };
        let unmanaged = Action::DecideRequestOf { owner_manager_id: None };

        assert!(is_allowed(MANAGER, own_report));
        assert!(!is_allowed(MANAGER, someone_elses));
        assert!(!is_allowed(MANAGER, unmanaged));
    }

    #[test]
    fn admins_never_decide() {
        let admin_report = Action::DecideRequestOf { owner_manager_id: Some(ADMIN.employee_id) };
        assert!(!is_allowed(ADMIN, Action::DecideRequests));
        assert!(!is_allowed(ADMIN, admin_report));
    }

    #[test]
    fn employee_cannot_decide_even_when_named_as_manager() {
        let report = Action::DecideRequestOf { owner_manager_id: Some(EMPLOYEE.employee_id) };
        assert!(!is_allowed(EMPLOYEE, Action::DecideRequests));
        assert!(!is_allowed(EMPLOYEE, report));
    }

    #[test]
    fn denial_is_forbidden() {
        assert!(matches!(
            authorize(EMPLOYEE, Action::ViewAdminDashboard),
            Err(AppError::Forbidden)
        ));
        assert!(authorize(ADMIN, Action::ViewAdminDashboard).is_ok());
    }
}
