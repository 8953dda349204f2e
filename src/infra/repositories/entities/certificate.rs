//! Gift certificate database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::config::PRICE_SCALE;
use crate::domain::{Certificate, Tag};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "gift_certificates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
    pub duration: i32,
    pub create_date: DateTimeUtc,
    pub last_update_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::certificate_tag::Entity")]
    CertificateTag,
    #[sea_orm(has_many = "super::order::Entity")]
    Order,
}

impl Related<super::certificate_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CertificateTag.def()
    }
}

impl Related<super::order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_certificate(self, tags: Vec<Tag>) -> Certificate {
        let mut price = self.price;
        price.rescale(PRICE_SCALE);

        Certificate {
            id: self.id,
            name: self.name,
            description: self.description,
            price,
            duration: self.duration,
            create_date: self.create_date,
            last_update_date: self.last_update_date,
            tags,
        }
    }
}
