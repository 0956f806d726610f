//! `ferp buyer` command - Buyer management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::context::print_notice;
use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{CliContext, GlobalOpts, OutputFormat};
use crate::console::FormMode;
use crate::core::config::Config;
use crate::core::entity::Entity;
use crate::core::role::Section;
use crate::entities::buyer::{Buyer, BuyerFilters, BuyerForm};

#[derive(Subcommand, Debug)]
pub enum BuyerCommands {
    /// List buyers, 10 per page
    List(ListArgs),

    /// List active buyers (the sample request dropdown)
    Active,

    /// Show a buyer's details
    Show(ShowArgs),

    /// Create a new buyer
    New(BuyerFields),

    /// Update a buyer
    Edit(EditArgs),

    /// Delete a buyer (soft delete on the server)
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: u32,

    /// Filter by name (server-side)
    #[arg(long)]
    pub name: Option<String>,

    /// Filter by email (server-side)
    #[arg(long)]
    pub email: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Buyer ID
    pub id: String,
}

/// Buyer form fields; omitted fields stay empty (new) or unchanged (edit)
#[derive(clap::Args, Debug, Default)]
pub struct BuyerFields {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub contact: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub address: Option<String>,
}

impl BuyerFields {
    fn apply(self, form: &mut BuyerForm) {
        if let Some(v) = self.name {
            form.name = v;
        }
        if let Some(v) = self.contact {
            form.contact_person = v;
        }
        if let Some(v) = self.email {
            form.email = v;
        }
        if let Some(v) = self.phone {
            form.phone = v;
        }
        if let Some(v) = self.address {
            form.address = v;
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Buyer ID
    pub id: String,

    #[command(flatten)]
    pub fields: BuyerFields,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Buyer ID
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

const BUYER_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 12),
    ColumnDef::new("name", "NAME", 24),
    ColumnDef::new("contact", "CONTACT", 18),
    ColumnDef::new("email", "EMAIL", 26),
    ColumnDef::new("phone", "PHONE", 16),
];

pub async fn run(cmd: BuyerCommands, config: Config, global: &GlobalOpts) -> Result<()> {
    let ctx = CliContext::new(config, global)?;
    match cmd {
        BuyerCommands::List(args) => run_list(&ctx, args, global).await,
        BuyerCommands::Active => run_active(&ctx, global).await,
        BuyerCommands::Show(args) => run_show(&ctx, args, global).await,
        BuyerCommands::New(fields) => run_save(&ctx, FormMode::Create, fields, global).await,
        BuyerCommands::Edit(args) => {
            run_save(&ctx, FormMode::Edit(args.id), args.fields, global).await
        }
        BuyerCommands::Delete(args) => run_delete(&ctx, args).await,
    }
}

async fn run_list(ctx: &CliContext, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::Buyers)?;

    let filters = BuyerFilters {
        name: args.name,
        email: args.email,
    };
    let page = ctx
        .console
        .buyers(args.page, &filters)
        .await
        .map_err(|e| ctx.fail(e))?;

    let format = effective_format(global.format, true);
    if print_serialized(&page, format)? {
        return Ok(());
    }

    let rows: Vec<TableRow> = page.buyers.iter().map(buyer_to_row).collect();
    TableFormatter::new(BUYER_COLUMNS, "buyer").output(rows, format, &[])?;

    if format == OutputFormat::Table && page.total_pages > 1 {
        println!(
            "Page {} of {} ({} total)",
            style(page.page).cyan(),
            page.total_pages,
            page.total
        );
    }
    Ok(())
}

fn buyer_to_row(buyer: &Buyer) -> TableRow {
    TableRow::new(buyer.id())
        .cell("id", CellValue::Id(buyer.id.clone()))
        .cell("name", CellValue::Text(buyer.name.clone()))
        .cell("contact", CellValue::Text(buyer.contact_person.clone()))
        .cell("email", CellValue::Text(buyer.email.clone()))
        .cell("phone", CellValue::Text(buyer.phone.clone()))
}

async fn run_active(ctx: &CliContext, global: &GlobalOpts) -> Result<()> {
    // Sales staff pick buyers while drafting requests
    ctx.require(Section::SampleRequests)?;

    let buyers = ctx
        .console
        .active_buyers()
        .await
        .map_err(|e| ctx.fail(e))?;

    let format = effective_format(global.format, true);
    if print_serialized(&buyers, format)? {
        return Ok(());
    }

    const ACTIVE_COLUMNS: &[ColumnDef] = &[
        ColumnDef::new("id", "ID", 12),
        ColumnDef::new("name", "NAME", 28),
        ColumnDef::new("contact", "CONTACT", 22),
    ];
    let rows = buyers
        .iter()
        .map(|b| {
            TableRow::new(b.id.clone())
                .cell("id", CellValue::Id(b.id.clone()))
                .cell("name", CellValue::Text(b.name.clone()))
                .cell("contact", CellValue::Text(b.contact_person.clone()))
        })
        .collect();
    TableFormatter::new(ACTIVE_COLUMNS, "buyer").output(rows, format, &[])
}

async fn run_show(ctx: &CliContext, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::Buyers)?;

    let buyer = ctx
        .console
        .buyer(&args.id)
        .await
        .map_err(|e| ctx.fail(e))?;

    if print_serialized(&buyer, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", buyer.id);
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&buyer.id).cyan());
    println!("{}: {}", style("Name").bold(), style(&buyer.name).yellow());
    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("Contact").bold(), buyer.contact_person);
    println!("{}: {}", style("Email").bold(), buyer.email);
    println!("{}: {}", style("Phone").bold(), buyer.phone);
    println!("{}: {}", style("Address").bold(), buyer.address);
    if buyer.is_deleted {
        println!("{}", style("This buyer has been deleted").red());
    }
    if let Some(created) = buyer.created_at {
        println!("{}", style("─".repeat(60)).dim());
        println!(
            "{}: {}",
            style("Created").dim(),
            created.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

async fn run_save(
    ctx: &CliContext,
    mode: FormMode,
    fields: BuyerFields,
    global: &GlobalOpts,
) -> Result<()> {
    ctx.require(Section::Buyers)?;

    let mut form = match &mode {
        FormMode::Create => BuyerForm::default(),
        FormMode::Edit(id) => {
            let buyer = ctx.console.buyer(id).await.map_err(|e| ctx.fail(e))?;
            BuyerForm::from(&buyer)
        }
    };
    fields.apply(&mut form);

    let saved = ctx
        .console
        .save_buyer(&mode, &form)
        .await
        .map_err(|e| ctx.fail(e))?;

    if global.format == OutputFormat::Id {
        println!("{}", saved.record.id);
    } else if !print_serialized(&saved.record, global.format)? {
        print_notice(&saved.notice);
        println!("   {} ({})", saved.record.title(), style(saved.record.id()).cyan());
    }
    Ok(())
}

async fn run_delete(ctx: &CliContext, args: DeleteArgs) -> Result<()> {
    ctx.require(Section::Buyers)?;

    let prompt = format!("Delete buyer {}?", args.id);
    match ctx.confirm(&prompt, args.yes)? {
        Some(true) => {}
        Some(false) => {
            println!("Aborted.");
            return Ok(());
        }
        None => miette::bail!("Refusing to delete without confirmation; pass --yes"),
    }

    let notice = ctx
        .console
        .delete_buyer(&args.id)
        .await
        .map_err(|e| ctx.fail(e))?;
    print_notice(&notice);
    Ok(())
}
