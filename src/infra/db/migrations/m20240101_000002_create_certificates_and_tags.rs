//! Migration: gift certificates, tags and the link table between them.

use sea_orm_migration::prelude::*;

use super::GiftCertificates;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tags::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Tags::Name)
                            .string_len(45)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GiftCertificates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GiftCertificates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(GiftCertificates::Name)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GiftCertificates::Description)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GiftCertificates::Price)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GiftCertificates::Duration)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GiftCertificates::CreateDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(GiftCertificates::LastUpdateDate)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CertificateTags::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CertificateTags::CertificateId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CertificateTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(CertificateTags::CertificateId)
                            .col(CertificateTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_certificate_tags_certificate_id")
                            .from(CertificateTags::Table, CertificateTags::CertificateId)
                            .to(GiftCertificates::Table, GiftCertificates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_certificate_tags_tag_id")
                            .from(CertificateTags::Table, CertificateTags::TagId)
                            .to(Tags::Table, Tags::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_certificate_tags_tag_id")
                    .table(CertificateTags::Table)
                    .col(CertificateTags::TagId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CertificateTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GiftCertificates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Tags {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum CertificateTags {
    Table,
    CertificateId,
    TagId,
}
