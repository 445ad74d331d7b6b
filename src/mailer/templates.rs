//! Email copy for the lead-magnet pipeline.
//!
//! Three message families per lead magnet: the delivery email to the
//! subscriber, the sandbox summary redirected to the site owner, and the
//! best-effort new-signup notification.

/// Delivery email body (HTML) sent to the subscriber with the attachment.
pub fn delivery_html(lead_title: &str, name: &str) -> String {
    format!(
        "<div style=\"font-family: Georgia, serif; max-width: 600px; margin: 0 auto;\">\
         <h2>Welcome aboard, {name}!</h2>\
         <p>Thank you for joining the newsletter. Your copy of\
         <strong>{lead_title}</strong> is attached to this email.</p>\
         <p>Happy reading!</p>\
         </div>"
    )
}

/// Delivery email body (plain text).
pub fn delivery_text(lead_title: &str, name: &str) -> String {
    format!(
        "Welcome aboard, {name}!\n\n\
         Thank you for joining the newsletter. Your copy of {lead_title} is \
         attached to this email.\n\nHappy reading!"
    )
}

/// Sandbox summary (HTML) sent to the owner mailbox instead of the
/// subscriber, describing what production delivery would have been.
pub fn sandbox_html(lead_title: &str, name: &str, email: &str, city: &str) -> String {
    format!(
        "<div style=\"font-family: monospace;\">\
         <h3>Sandbox delivery</h3>\
         <p>No verified sending domain is configured, so this summary was \
         redirected to the site mailbox.</p>\
         <p>In production, <strong>{email}</strong> would have received \
         <strong>{lead_title}</strong>.</p>\
         <ul><li>Name: {name}</li><li>Email: {email}</li><li>City: {city}</li></ul>\
         </div>"
    )
}

/// Sandbox summary (plain text).
pub fn sandbox_text(lead_title: &str, name: &str, email: &str, city: &str) -> String {
    format!(
        "Sandbox delivery.\n\n\
         In production, {email} would have received {lead_title}.\n\
         Name: {name}\nEmail: {email}\nCity: {city}"
    )
}

/// New-signup notification (HTML) for the site owner.
pub fn owner_notification_html(lead_title: &str, name: &str, email: &str, city: &str) -> String {
    format!(
        "<div style=\"font-family: sans-serif;\">\
         <h3>New signup: {lead_title}</h3>\
         <ul><li>Name: {name}</li><li>Email: {email}</li><li>City: {city}</li></ul>\
         </div>"
    )
}

/// New-signup notification (plain text).
pub fn owner_notification_text(lead_title: &str, name: &str, email: &str, city: &str) -> String {
    format!("New signup: {lead_title}\nName: {name}\nEmail: {email}\nCity: {city}")
}
