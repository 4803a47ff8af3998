//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication and SDS followers
//! - `partners`: sponsors, correspondents and suppliers
//! - `contract_origins`, `sds_follower_settings`: sponsorship configuration
//! - `field_offices`, `projects`, `children`, `child_pictures`: child pool
//! - `sponsorships`: recurring contracts and their SDS status
//! - `sms_child_requests`: children requested by SMS
//! - `journals`, `completion_rules`, `journal_completion_rules`: statement
//!   completion setup
//! - `invoices`, `move_lines`, `payment_lines`: accounting data searched by
//!   the completion rules

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Partners {
    Table,
    Id,
    #[iden = "ref"]
    Reference,
    Firstname,
    Lastname,
    Email,
    Phone,
    Lang,
    CommercialPartnerId,
}

#[derive(Iden)]
enum ContractOrigins {
    Table,
    Id,
    Name,
    #[iden = "type"]
    Kind,
}

#[derive(Iden)]
enum SdsFollowerSettings {
    Table,
    Key,
    UserId,
}

#[derive(Iden)]
enum FieldOffices {
    Table,
    Id,
    CountryCode,
    Name,
    AvailableOnChildpool,
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    FcpId,
    Name,
    City,
    Country,
    Latitude,
    Longitude,
}

#[derive(Iden)]
enum Children {
    Table,
    Id,
    GlobalId,
    LocalId,
    Name,
    Firstname,
    Lastname,
    Gender,
    Birthdate,
    Age,
    Weight,
    Height,
    EducationLevel,
    AcademicPerformance,
    VocationalTrainingType,
    SponsorshipStatus,
    DescEn,
    ImageUrl,
    FieldOfficeId,
    ProjectId,
    SponsorId,
}

#[derive(Iden)]
enum ChildPictures {
    Table,
    Id,
    ChildId,
    ImageUrl,
    Date,
}

#[derive(Iden)]
enum Sponsorships {
    Table,
    Id,
    PartnerId,
    CorrespondentId,
    ChildId,
    #[iden = "type"]
    Kind,
    State,
    EndReason,
    OriginId,
    ParentId,
    SubSponsorshipId,
    SdsState,
    SdsStateDate,
    Color,
    NoSubReason,
    SdsUid,
    SubNotes,
    CancelGiftsOnTermination,
    CreatedAt,
}

#[derive(Iden)]
enum SmsChildRequests {
    Table,
    Id,
    Sender,
    PartnerId,
    ChildId,
    SponsorshipConfirmed,
    Gender,
    MinAge,
    MaxAge,
    FieldOfficeId,
    SponsorshipId,
}

#[derive(Iden)]
enum Journals {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum CompletionRules {
    Table,
    Id,
    Sequence,
    Name,
    Function,
}

#[derive(Iden)]
enum JournalCompletionRules {
    Table,
    JournalId,
    RuleId,
}

#[derive(Iden)]
enum Invoices {
    Table,
    Id,
    PartnerId,
    #[iden = "type"]
    Kind,
    State,
    AmountTotalMinor,
}

#[derive(Iden)]
enum MoveLines {
    Table,
    Id,
    #[iden = "ref"]
    Reference,
    PartnerId,
}

#[derive(Iden)]
enum PaymentLines {
    Table,
    Id,
    Name,
    PartnerId,
    Date,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Partners
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Partners::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Partners::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Partners::Reference).string())
                    .col(ColumnDef::new(Partners::Firstname).string())
                    .col(ColumnDef::new(Partners::Lastname).string().not_null())
                    .col(ColumnDef::new(Partners::Email).string())
                    .col(ColumnDef::new(Partners::Phone).string())
                    .col(ColumnDef::new(Partners::Lang).string())
                    .col(ColumnDef::new(Partners::CommercialPartnerId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-partners-commercial_partner_id")
                            .from(Partners::Table, Partners::CommercialPartnerId)
                            .to(Partners::Table, Partners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-partners-ref-unique")
                    .table(Partners::Table)
                    .col(Partners::Reference)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Sponsorship configuration
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(ContractOrigins::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContractOrigins::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContractOrigins::Name).string().not_null())
                    .col(ColumnDef::new(ContractOrigins::Kind).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SdsFollowerSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SdsFollowerSettings::Key)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SdsFollowerSettings::UserId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sds_follower_settings-user_id")
                            .from(SdsFollowerSettings::Table, SdsFollowerSettings::UserId)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Child pool
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(FieldOffices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FieldOffices::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(FieldOffices::CountryCode).string().not_null())
                    .col(ColumnDef::new(FieldOffices::Name).string().not_null())
                    .col(
                        ColumnDef::new(FieldOffices::AvailableOnChildpool)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::FcpId).string().not_null())
                    .col(ColumnDef::new(Projects::Name).string().not_null())
                    .col(ColumnDef::new(Projects::City).string())
                    .col(ColumnDef::new(Projects::Country).string())
                    .col(ColumnDef::new(Projects::Latitude).double())
                    .col(ColumnDef::new(Projects::Longitude).double())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Children::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Children::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Children::GlobalId).string().not_null())
                    .col(ColumnDef::new(Children::LocalId).string())
                    .col(ColumnDef::new(Children::Name).string().not_null())
                    .col(ColumnDef::new(Children::Firstname).string())
                    .col(ColumnDef::new(Children::Lastname).string())
                    .col(ColumnDef::new(Children::Gender).string())
                    .col(ColumnDef::new(Children::Birthdate).date())
                    .col(ColumnDef::new(Children::Age).integer())
                    .col(ColumnDef::new(Children::Weight).string())
                    .col(ColumnDef::new(Children::Height).string())
                    .col(ColumnDef::new(Children::EducationLevel).string())
                    .col(ColumnDef::new(Children::AcademicPerformance).string())
                    .col(ColumnDef::new(Children::VocationalTrainingType).string())
                    .col(ColumnDef::new(Children::SponsorshipStatus).string())
                    .col(ColumnDef::new(Children::DescEn).text())
                    .col(ColumnDef::new(Children::ImageUrl).string())
                    .col(ColumnDef::new(Children::FieldOfficeId).string())
                    .col(ColumnDef::new(Children::ProjectId).string())
                    .col(ColumnDef::new(Children::SponsorId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-children-field_office_id")
                            .from(Children::Table, Children::FieldOfficeId)
                            .to(FieldOffices::Table, FieldOffices::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-children-project_id")
                            .from(Children::Table, Children::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-children-sponsor_id")
                            .from(Children::Table, Children::SponsorId)
                            .to(Partners::Table, Partners::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-children-global_id-unique")
                    .table(Children::Table)
                    .col(Children::GlobalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChildPictures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChildPictures::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChildPictures::ChildId).string().not_null())
                    .col(ColumnDef::new(ChildPictures::ImageUrl).string())
                    .col(ColumnDef::new(ChildPictures::Date).date())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-child_pictures-child_id")
                            .from(ChildPictures::Table, ChildPictures::ChildId)
                            .to(Children::Table, Children::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Sponsorships
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Sponsorships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sponsorships::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sponsorships::PartnerId).string().not_null())
                    .col(
                        ColumnDef::new(Sponsorships::CorrespondentId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sponsorships::ChildId).string())
                    .col(ColumnDef::new(Sponsorships::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Sponsorships::State)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Sponsorships::EndReason).string())
                    .col(ColumnDef::new(Sponsorships::OriginId).string())
                    .col(ColumnDef::new(Sponsorships::ParentId).string())
                    .col(ColumnDef::new(Sponsorships::SubSponsorshipId).string())
                    .col(
                        ColumnDef::new(Sponsorships::SdsState)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Sponsorships::SdsStateDate).date())
                    .col(
                        ColumnDef::new(Sponsorships::Color)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Sponsorships::NoSubReason).string())
                    .col(ColumnDef::new(Sponsorships::SdsUid).string())
                    .col(ColumnDef::new(Sponsorships::SubNotes).text())
                    .col(
                        ColumnDef::new(Sponsorships::CancelGiftsOnTermination)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Sponsorships::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sponsorships-partner_id")
                            .from(Sponsorships::Table, Sponsorships::PartnerId)
                            .to(Partners::Table, Partners::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sponsorships-correspondent_id")
                            .from(Sponsorships::Table, Sponsorships::CorrespondentId)
                            .to(Partners::Table, Partners::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sponsorships-child_id")
                            .from(Sponsorships::Table, Sponsorships::ChildId)
                            .to(Children::Table, Children::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sponsorships-origin_id")
                            .from(Sponsorships::Table, Sponsorships::OriginId)
                            .to(ContractOrigins::Table, ContractOrigins::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sponsorships-parent_id")
                            .from(Sponsorships::Table, Sponsorships::ParentId)
                            .to(Sponsorships::Table, Sponsorships::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sponsorships-sub_sponsorship_id")
                            .from(Sponsorships::Table, Sponsorships::SubSponsorshipId)
                            .to(Sponsorships::Table, Sponsorships::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sponsorships-sds_uid")
                            .from(Sponsorships::Table, Sponsorships::SdsUid)
                            .to(Users::Table, Users::Username)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sponsorships-correspondent_id")
                    .table(Sponsorships::Table)
                    .col(Sponsorships::CorrespondentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sponsorships-sds_state")
                    .table(Sponsorships::Table)
                    .col(Sponsorships::SdsState)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-sponsorships-parent_id")
                    .table(Sponsorships::Table)
                    .col(Sponsorships::ParentId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 6. SMS child requests
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(SmsChildRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SmsChildRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SmsChildRequests::Sender).string().not_null())
                    .col(ColumnDef::new(SmsChildRequests::PartnerId).string())
                    .col(ColumnDef::new(SmsChildRequests::ChildId).string())
                    .col(
                        ColumnDef::new(SmsChildRequests::SponsorshipConfirmed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(SmsChildRequests::Gender).string())
                    .col(ColumnDef::new(SmsChildRequests::MinAge).integer())
                    .col(ColumnDef::new(SmsChildRequests::MaxAge).integer())
                    .col(ColumnDef::new(SmsChildRequests::FieldOfficeId).string())
                    .col(ColumnDef::new(SmsChildRequests::SponsorshipId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sms_child_requests-partner_id")
                            .from(SmsChildRequests::Table, SmsChildRequests::PartnerId)
                            .to(Partners::Table, Partners::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sms_child_requests-child_id")
                            .from(SmsChildRequests::Table, SmsChildRequests::ChildId)
                            .to(Children::Table, Children::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sms_child_requests-field_office_id")
                            .from(SmsChildRequests::Table, SmsChildRequests::FieldOfficeId)
                            .to(FieldOffices::Table, FieldOffices::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-sms_child_requests-sponsorship_id")
                            .from(SmsChildRequests::Table, SmsChildRequests::SponsorshipId)
                            .to(Sponsorships::Table, Sponsorships::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 7. Statement completion
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Journals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Journals::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Journals::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-journals-name-unique")
                    .table(Journals::Table)
                    .col(Journals::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CompletionRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompletionRules::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompletionRules::Sequence)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(ColumnDef::new(CompletionRules::Name).string().not_null())
                    .col(ColumnDef::new(CompletionRules::Function).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JournalCompletionRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JournalCompletionRules::JournalId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JournalCompletionRules::RuleId)
                            .string()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(JournalCompletionRules::JournalId)
                            .col(JournalCompletionRules::RuleId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_completion_rules-journal_id")
                            .from(
                                JournalCompletionRules::Table,
                                JournalCompletionRules::JournalId,
                            )
                            .to(Journals::Table, Journals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-journal_completion_rules-rule_id")
                            .from(JournalCompletionRules::Table, JournalCompletionRules::RuleId)
                            .to(CompletionRules::Table, CompletionRules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 8. Accounting data
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Invoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Invoices::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Invoices::PartnerId).string().not_null())
                    .col(ColumnDef::new(Invoices::Kind).string().not_null())
                    .col(ColumnDef::new(Invoices::State).string().not_null())
                    .col(
                        ColumnDef::new(Invoices::AmountTotalMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-invoices-partner_id")
                            .from(Invoices::Table, Invoices::PartnerId)
                            .to(Partners::Table, Partners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-invoices-type-state-amount")
                    .table(Invoices::Table)
                    .col(Invoices::Kind)
                    .col(Invoices::State)
                    .col(Invoices::AmountTotalMinor)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(MoveLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MoveLines::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MoveLines::Reference).string())
                    .col(ColumnDef::new(MoveLines::PartnerId).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-move_lines-partner_id")
                            .from(MoveLines::Table, MoveLines::PartnerId)
                            .to(Partners::Table, Partners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-move_lines-ref")
                    .table(MoveLines::Table)
                    .col(MoveLines::Reference)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PaymentLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PaymentLines::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PaymentLines::Name).string().not_null())
                    .col(ColumnDef::new(PaymentLines::PartnerId).string().not_null())
                    .col(ColumnDef::new(PaymentLines::Date).date().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-payment_lines-partner_id")
                            .from(PaymentLines::Table, PaymentLines::PartnerId)
                            .to(Partners::Table, Partners::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-payment_lines-name")
                    .table(PaymentLines::Table)
                    .col(PaymentLines::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop in reverse order of creation (respecting FK dependencies)
        manager
            .drop_table(Table::drop().table(PaymentLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MoveLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Invoices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JournalCompletionRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompletionRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Journals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SmsChildRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sponsorships::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChildPictures::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Children::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(FieldOffices::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SdsFollowerSettings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ContractOrigins::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Partners::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
