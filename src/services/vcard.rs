//! Generación de tarjetas de visita en formato vCard 3.0 (RFC 2426)

use crate::models::business_card::BusinessCard;

/// Escapar un valor de texto según RFC 2426
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            '\r' => {}
            other => escaped.push(other),
        }
    }
    escaped
}

/// Separar "Nombre Apellido" en (apellido, nombres)
fn split_name(full_name: &str) -> (String, String) {
    let mut parts: Vec<&str> = full_name.split_whitespace().collect();
    match parts.len() {
        0 => (String::new(), String::new()),
        1 => (String::new(), parts[0].to_string()),
        _ => {
            let family = parts.pop().unwrap_or_default().to_string();
            (family, parts.join(" "))
        }
    }
}

pub fn render_vcard(card: &BusinessCard) -> String {
    let (family, given) = split_name(&card.full_name);

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("N:{};{};;;", escape(&family), escape(&given)),
        format!("FN:{}", escape(&card.full_name)),
    ];

    let org = match (&card.company_name, &card.department) {
        (Some(company), Some(department)) => Some(format!("{};{}", escape(company), escape(department))),
        (Some(company), None) => Some(escape(company)),
        (None, Some(department)) => Some(escape(department)),
        (None, None) => None,
    };
    if let Some(org) = org {
        lines.push(format!("ORG:{}", org));
    }
    if let Some(position) = &card.position {
        lines.push(format!("TITLE:{}", escape(position)));
    }
    if let Some(phone) = &card.phone {
        lines.push(format!("TEL;TYPE=WORK,VOICE:{}", escape(phone)));
    }
    if let Some(email) = &card.email {
        lines.push(format!("EMAIL;TYPE=INTERNET,WORK:{}", escape(email)));
    }
    if let Some(address) = &card.address {
        lines.push(format!("ADR;TYPE=WORK:;;{};;;;", escape(address)));
    }
    if let Some(website) = &card.website {
        lines.push(format!("URL:{}", website));
    }
    lines.push(format!("REV:{}", card.updated_at.format("%Y-%m-%dT%H:%M:%SZ")));
    lines.push("END:VCARD".to_string());

    let mut vcard = lines.join("\r\n");
    vcard.push_str("\r\n");
    vcard
}

/// Nombre de archivo para la descarga
pub fn vcard_filename(card: &BusinessCard) -> String {
    let slug: String = card
        .full_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        format!("{}.vcf", card.id)
    } else {
        format!("{}.vcf", slug)
    }
}
