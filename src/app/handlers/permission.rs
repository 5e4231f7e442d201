// SPDX-License-Identifier: GPL-3.0-only

//! Permission handlers

use crate::app::access::{self, AccessReaction};
use crate::app::state::{AppModel, Message, Notice};
use crate::backends::permission::{Permission, PermissionGrant, PermissionStatus};
use crate::constants::timing;
use crate::fl;
use cosmic::Task;
use tracing::{info, warn};

impl AppModel {
    pub(crate) fn handle_permission_status_known(
        &mut self,
        status: PermissionStatus,
    ) -> Task<cosmic::Action<Message>> {
        info!(?status, "Camera permission status");
        self.observe_permission(status, false)
    }

    pub(crate) fn handle_request_permission(&mut self) -> Task<cosmic::Action<Message>> {
        if self.permission_pending {
            return Task::none();
        }
        self.permission_pending = true;

        info!("Requesting camera permission");
        Task::perform(
            self.permissions.request(Permission::REQUIRED.to_vec()),
            |grant| cosmic::Action::App(Message::PermissionResult(grant)),
        )
    }

    pub(crate) fn handle_permission_result(
        &mut self,
        grant: PermissionGrant,
    ) -> Task<cosmic::Action<Message>> {
        self.permission_pending = false;

        if !grant.all_granted() {
            warn!(denied = ?grant.denied, "Permissions denied");
        }

        self.observe_permission(grant.camera_status(), true)
    }

    pub(crate) fn handle_dismiss_notice(&mut self, id: u64) -> Task<cosmic::Action<Message>> {
        if self.notice.as_ref().is_some_and(|n| n.id == id) {
            self.notice = None;
        }
        Task::none()
    }

    fn observe_permission(
        &mut self,
        status: PermissionStatus,
        requested: bool,
    ) -> Task<cosmic::Action<Message>> {
        self.permission = status;
        match access::observe(&mut self.session, status, requested) {
            AccessReaction::Reset => {
                self.notice = None;
                self.restart_surface();
                Task::none()
            }
            AccessReaction::Notice => self.show_notice(fl!("permission-denied-notice")),
            AccessReaction::Wait => Task::none(),
        }
    }

    fn show_notice(&mut self, text: String) -> Task<cosmic::Action<Message>> {
        self.next_notice_id += 1;
        let id = self.next_notice_id;
        self.notice = Some(Notice { id, text });
        Self::delay_task(timing::NOTICE_DISPLAY_MS, Message::DismissNotice(id))
    }
}
