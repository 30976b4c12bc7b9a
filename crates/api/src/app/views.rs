//! Server-rendered HTML pages.
//!
//! Every user-supplied value passes through [`escape`] before it reaches the
//! markup.

use std::fmt::Write as _;

use stockbook_core::ItemId;
use stockbook_inventory::{InventoryItem, ItemForm};

use crate::app::dto::Notice;

/// HTML-escape text for element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         {body}\n\
         </body>\n\
         </html>\n",
        title = escape(title),
    )
}

fn banner(class: &str, text: &str) -> String {
    format!("<p class=\"{class}\">{}</p>\n", escape(text))
}

/// Inventory table with edit/delete links.
pub fn list_page(items: &[InventoryItem], notice: Option<Notice>, error: Option<&str>) -> String {
    let mut body = String::new();

    if let Some(notice) = notice {
        let class = if notice.is_error() { "notice error" } else { "notice" };
        body.push_str(&banner(class, notice.message()));
    }
    if let Some(error) = error {
        body.push_str(&banner("notice error", error));
    }

    body.push_str("<p><a href=\"/add\">Add item</a></p>\n");

    if items.is_empty() {
        body.push_str("<p>No items yet.</p>\n");
        return layout("Inventory", &body);
    }

    body.push_str(
        "<table>\n<thead><tr>\
         <th>Name</th><th>Price</th><th>MAC address</th><th>Serial number</th>\
         <th>Manufacturer</th><th>Description</th><th></th>\
         </tr></thead>\n<tbody>\n",
    );
    for item in items {
        // Writing into a String cannot fail.
        let _ = writeln!(
            body,
            "<tr><td>{name}</td><td>{price}</td><td>{mac}</td><td>{serial}</td>\
             <td>{manufacturer}</td><td>{description}</td>\
             <td><a href=\"/edit/{id}\">Edit</a> <a href=\"/delete/{id}\">Delete</a></td></tr>",
            name = escape(&item.name),
            price = format_price(item.price),
            mac = escape(item.mac_address.as_str()),
            serial = escape(&item.serial_number),
            manufacturer = escape(&item.manufacturer),
            description = escape(item.description.as_deref().unwrap_or("")),
            id = item.id,
        );
    }
    body.push_str("</tbody>\n</table>\n");

    layout("Inventory", &body)
}

/// Add form (`id == None`) or edit form, prefilled with `form` and listing `errors`.
pub fn form_page(id: Option<ItemId>, form: &ItemForm, errors: &[String]) -> String {
    let (title, action) = match id {
        Some(id) => ("Edit item".to_string(), format!("/edit/{id}")),
        None => ("Add item".to_string(), "/add".to_string()),
    };

    let mut body = String::new();

    if !errors.is_empty() {
        body.push_str("<ul class=\"errors\">\n");
        for error in errors {
            let _ = writeln!(body, "<li>{}</li>", escape(error));
        }
        body.push_str("</ul>\n");
    }

    let _ = writeln!(body, "<form method=\"post\" action=\"{}\">", escape(&action));
    body.push_str(&input("name", "Name", form.name.as_deref()));
    body.push_str(&input("price", "Price", form.price.as_deref()));
    body.push_str(&input("mac_address", "MAC address", form.mac_address.as_deref()));
    body.push_str(&input("serial_number", "Serial number", form.serial_number.as_deref()));
    body.push_str(&input("manufacturer", "Manufacturer", form.manufacturer.as_deref()));
    let _ = writeln!(
        body,
        "<p><label for=\"description\">Description</label>\n\
         <textarea id=\"description\" name=\"description\">{}</textarea></p>",
        escape(form.description.as_deref().unwrap_or("")),
    );
    body.push_str("<p><button type=\"submit\">Save</button> <a href=\"/\">Cancel</a></p>\n</form>\n");

    layout(&title, &body)
}

/// Generic failure page (used by the panic guard).
pub fn error_page(message: &str) -> String {
    layout("Error", &format!("{}<p><a href=\"/\">Back to inventory</a></p>\n", banner("notice error", message)))
}

/// Stored price with at least two decimals and never rounded (`59.5` -> `59.50`, `0.001` stays).
fn format_price(price: f64) -> String {
    let mut text = price.to_string();
    match text.find('.') {
        Some(dot) => {
            for _ in text.len() - dot - 1..2 {
                text.push('0');
            }
        }
        None => text.push_str(".00"),
    }
    text
}

fn input(name: &str, label: &str, value: Option<&str>) -> String {
    format!(
        "<p><label for=\"{name}\">{label}</label>\n\
         <input id=\"{name}\" name=\"{name}\" type=\"text\" value=\"{value}\"></p>\n",
        value = escape(value.unwrap_or("")),
    )
}

#[cfg(test)]
mod tests {
    use stockbook_inventory::AuxiliaryFields;

    use super::*;

    fn sample() -> InventoryItem {
        ItemForm::new("<Router>", "49.99", "AA:BB:CC:DD:EE:FF", "SN001", "Acme & Co")
            .validate()
            .unwrap()
            .into_item(ItemId::new(7), AuxiliaryFields::default())
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#x27;&amp;&#x27;&lt;/a&gt;");
    }

    #[test]
    fn list_page_escapes_values_and_links_by_id() {
        let html = list_page(&[sample()], Some(Notice::Created), None);
        assert!(html.contains("&lt;Router&gt;"));
        assert!(html.contains("Acme &amp; Co"));
        assert!(html.contains("49.99"));
        assert!(html.contains("href=\"/edit/7\""));
        assert!(html.contains("href=\"/delete/7\""));
        assert!(html.contains(Notice::Created.message()));
    }

    #[test]
    fn prices_are_padded_but_never_rounded() {
        assert_eq!(format_price(49.99), "49.99");
        assert_eq!(format_price(59.5), "59.50");
        assert_eq!(format_price(12.0), "12.00");
        assert_eq!(format_price(0.001), "0.001");
        assert_eq!(format_price(19.999), "19.999");
    }

    #[test]
    fn list_page_shows_load_error() {
        let html = list_page(&[], None, Some("Could not load"));
        assert!(html.contains("Could not load"));
        assert!(html.contains("No items yet."));
    }

    #[test]
    fn form_page_keeps_submitted_values_and_errors() {
        let form = ItemForm::new("Router", "-5", "AA:BB:CC:DD:EE:FF", "SN001", "Acme");
        let html = form_page(None, &form, &["Price must be greater than zero".to_string()]);
        assert!(html.contains("action=\"/add\""));
        assert!(html.contains("value=\"-5\""));
        assert!(html.contains("<li>Price must be greater than zero</li>"));

        let html = form_page(Some(ItemId::new(3)), &form, &[]);
        assert!(html.contains("action=\"/edit/3\""));
        assert!(!html.contains("class=\"errors\""));
    }
}
