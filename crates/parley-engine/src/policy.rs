use parley_config::TranslationSettings;
use parley_types::Message;

/// Why a message skips translation entirely
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligible {
    Disabled,
    NoText,
    System,
    GiftEvent,
    Outgoing,
}

/// Body to translate, or the reason there is none.
///
/// Decided from settings and the message alone; no cache or network.
pub fn eligible_text<'a>(
    message: &'a Message,
    settings: &TranslationSettings,
) -> Result<&'a str, Ineligible> {
    if !settings.enabled {
        return Err(Ineligible::Disabled);
    }

    if message.is_system() {
        return Err(Ineligible::System);
    }

    if message.is_gift_event() {
        return Err(Ineligible::GiftEvent);
    }

    if message.outgoing && !settings.translate_outgoing {
        return Err(Ineligible::Outgoing);
    }

    message.body().ok_or(Ineligible::NoText)
}
