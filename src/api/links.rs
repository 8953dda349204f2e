//! Links attached to each resource representation.

use crate::domain::{ReadCertificate, ReadOrder, ReadTag, ReadUser};
use crate::types::{EntityModel, Link};

pub fn tag_href(id: i32) -> String {
    format!("/tags/{}", id)
}

pub fn certificate_href(id: i32) -> String {
    format!("/certificates/{}", id)
}

pub fn user_href(id: i32) -> String {
    format!("/users/{}", id)
}

pub fn order_href(user_id: i32, order_id: i32) -> String {
    format!("/users/{}/orders/{}", user_id, order_id)
}

pub fn tag_links(tag: &ReadTag) -> Vec<Link> {
    vec![Link::self_link(tag_href(tag.id))]
}

pub fn certificate_links(certificate: &ReadCertificate) -> Vec<Link> {
    let mut links = vec![Link::self_link(certificate_href(certificate.id))];
    links.extend(
        certificate
            .tags
            .iter()
            .map(|tag| Link::new("tags", tag_href(tag.id))),
    );
    links
}

pub fn user_links(user: &ReadUser) -> Vec<Link> {
    vec![
        Link::self_link(user_href(user.id)),
        Link::new("orders", format!("{}/orders", user_href(user.id))),
    ]
}

pub fn order_links(order: &ReadOrder) -> Vec<Link> {
    vec![
        Link::self_link(order_href(order.user_id, order.id)),
        Link::new("user", user_href(order.user_id)),
        Link::new("certificate", certificate_href(order.certificate_id)),
    ]
}

/// Wrap a representation with the links produced by `links`
pub fn with_links<T>(content: T, links: impl Fn(&T) -> Vec<Link>) -> EntityModel<T> {
    let links = links(&content);
    EntityModel::new(content, links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    #[test]
    fn test_order_links() {
        let order = ReadOrder {
            id: 9,
            user_id: 2,
            certificate_id: 5,
            cost: Decimal::new(1000, 2),
            purchase_date: Utc::now(),
        };
        let model = with_links(order, order_links);

        let hrefs: Vec<&str> = model.links.iter().map(|l| l.href.as_str()).collect();
        assert_eq!(hrefs, vec!["/users/2/orders/9", "/users/2", "/certificates/5"]);
    }
}
