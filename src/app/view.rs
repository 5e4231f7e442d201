// SPDX-License-Identifier: GPL-3.0-only

//! Main application view
//!
//! One screen at a time, picked by [`Screen::derive`]:
//! - Permission prompt
//! - Viewfinder (live preview + capture button)
//! - Saved photo confirmation
//! - Error with retry

use crate::app::screen::Screen;
use crate::app::state::{AppModel, Message};
use crate::backends::capture::ResourceHandle;
use crate::constants::ui;
use crate::fl;
use cosmic::Element;
use cosmic::iced::{Alignment, Background, Color, ContentFit, Length};
use cosmic::widget;

impl AppModel {
    /// Build the main application view
    pub fn view(&self) -> Element<'_, Message> {
        let content = match self.screen() {
            Screen::PermissionPrompt { rationale } => self.permission_view(rationale),
            Screen::Viewfinder { capture_enabled } => self.viewfinder_view(capture_enabled),
            Screen::Saved(handle) => Self::saved_view(&handle),
            Screen::Error(message) => Self::error_view(message),
        };

        widget::container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(ui::SCREEN_PADDING)
            .into()
    }

    fn permission_view(&self, rationale: bool) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let mut column = widget::column()
            .push(widget::text::title3(fl!("permission-title")))
            .spacing(spacing.space_s)
            .align_x(Alignment::Center);

        if rationale {
            column = column.push(widget::text::body(fl!("permission-rationale")));
        }

        column = column.push(
            widget::button::suggested(fl!("request-permission"))
                .on_press_maybe((!self.permission_pending).then_some(Message::RequestPermission)),
        );

        if let Some(notice) = &self.notice {
            column = column.push(
                widget::text::caption(notice.text.clone()).class(cosmic::theme::Text::Accent),
            );
        }

        centered(column.into())
    }

    fn viewfinder_view(&self, capture_enabled: bool) -> Element<'_, Message> {
        let spacing = cosmic::theme::spacing();

        let preview: Element<'_, Message> = match &self.preview {
            Some(handle) => widget::image(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => widget::container(widget::text::body(fl!("starting-camera")))
                .width(Length::Fill)
                .height(Length::Fill)
                .align_x(Alignment::Center)
                .align_y(Alignment::Center)
                .style(|_theme| widget::container::Style {
                    background: Some(Background::Color(Color::BLACK)),
                    text_color: Some(Color::WHITE),
                    ..Default::default()
                })
                .into(),
        };

        let can_capture = capture_enabled && !self.is_capturing;
        let capture_button = widget::button::suggested(fl!("take-photo"))
            .on_press_maybe(can_capture.then_some(Message::Capture));

        widget::column()
            .push(preview)
            .push(
                widget::container(capture_button)
                    .width(Length::Fill)
                    .align_x(Alignment::Center),
            )
            .spacing(spacing.space_s)
            .into()
    }

    fn saved_view(handle: &ResourceHandle) -> Element<'static, Message> {
        let spacing = cosmic::theme::spacing();
        let name = handle
            .path()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| handle.to_string());

        let buttons = widget::row()
            .push(widget::button::suggested(fl!("back-to-camera")).on_press(Message::ReturnToCamera))
            .push(widget::button::standard(fl!("open-photo")).on_press(Message::OpenPhoto))
            .spacing(spacing.space_xs);

        centered(
            widget::column()
                .push(widget::text::title3(fl!("photo-saved")))
                .push(widget::text::body(name))
                .push(buttons)
                .spacing(spacing.space_s)
                .align_x(Alignment::Center)
                .into(),
        )
    }

    fn error_view(message: String) -> Element<'static, Message> {
        let spacing = cosmic::theme::spacing();

        centered(
            widget::column()
                .push(widget::text::title3(fl!("error-title")))
                .push(widget::text::body(message))
                .push(widget::button::suggested(fl!("retry")).on_press(Message::Retry))
                .spacing(spacing.space_s)
                .align_x(Alignment::Center)
                .into(),
        )
    }
}

fn centered(content: Element<'_, Message>) -> Element<'_, Message> {
    widget::container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .into()
}
