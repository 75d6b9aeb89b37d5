//! # Payment Link Email
//!
//! Renders the "complete your payment" email sent after the gateway
//! returns a hosted payment page.

use relay_core::{EmailMessage, OrderSummary};

/// Compose the payment email for an order.
///
/// Returns `None` when there is no recipient or no payment link; there is
/// nothing useful to send in either case.
pub fn compose_payment_email(summary: &OrderSummary, payment_link: &str) -> Option<EmailMessage> {
    let to = summary
        .customer_email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())?;
    let link = payment_link.trim();
    if link.is_empty() {
        return None;
    }

    let subject = format!("Complete payment for order {}", summary.order_number);

    let address_block = if summary.address_lines.is_empty() {
        String::new()
    } else {
        let lines: Vec<String> = summary.address_lines.iter().map(|l| escape(l)).collect();
        format!(
            "<p style=\"margin: 16px 0 0; color: #555;\"><strong>Delivery address</strong><br>{}</p>",
            lines.join("<br>")
        )
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{subject}</title></head>
<body style="font-family: system-ui, sans-serif; background: #f5f5f7; margin: 0; padding: 32px;">
    <div style="max-width: 560px; margin: 0 auto; background: white; padding: 32px; border-radius: 12px;">
        <h1 style="font-size: 22px; margin: 0 0 16px;">Order {order}</h1>
        <p>Hi {name},</p>
        <p>Thanks for your order. To complete it, please pay <strong>{amount}</strong> using the secure link below.</p>
        <p style="text-align: center; margin: 32px 0;">
            <a href="{link}" style="background: #1a1a2e; color: white; padding: 14px 28px; border-radius: 8px; text-decoration: none;">Pay now</a>
        </p>
        <p style="font-size: 13px; color: #666;">If the button does not work, copy this link into your browser:<br><a href="{link}">{link}</a></p>
        {address_block}
    </div>
</body>
</html>
"#,
        subject = escape(&subject),
        order = escape(&summary.order_number),
        name = escape(&summary.customer_name),
        amount = escape(&summary.display_amount),
        link = escape(link),
        address_block = address_block,
    );

    Some(EmailMessage {
        to: to.to_string(),
        subject,
        html,
    })
}

/// Minimal HTML escaping for text and attribute values
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
