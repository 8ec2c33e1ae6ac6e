//! Inline status alerts

use review_core::view::{MessageKind, StatusMessage};
use yew::prelude::*;

pub fn alert_class(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "alert alert-info",
        MessageKind::Success => "alert alert-success",
        MessageKind::Error => "alert alert-danger",
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusAlertProps {
    pub message: Option<StatusMessage>,
}

#[function_component(StatusAlert)]
pub fn status_alert(props: &StatusAlertProps) -> Html {
    match &props.message {
        Some(message) => html! {
            <div class={alert_class(message.kind)} role="alert">{ &message.text }</div>
        },
        None => html! {},
    }
}
