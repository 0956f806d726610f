//! `ferp req` command - Sample request management and item workflow

use chrono::Utc;
use clap::Subcommand;
use console::style;
use miette::Result;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::api::UploadFile;
use crate::cli::context::print_notice;
use crate::cli::helpers::{
    format_date, format_meters, format_short_id, parse_date, parse_item_spec,
};
use crate::cli::output::{effective_format, print_serialized};
use crate::cli::table::{CellValue, ColumnDef, TableFormatter, TableRow};
use crate::cli::{CliContext, GlobalOpts, OutputFormat};
use crate::console::{
    AttachmentList, DateFilter, Form, FormMode, NameFilter, RequestListView, StatusFilter,
};
use crate::core::config::Config;
use crate::core::entity::Priority;
use crate::core::role::Section;
use crate::core::workflow::{next_status, TransitionPlan, WorkflowEngine};
use crate::entities::sample_request::{FabricItem, FabricItemForm, SampleRequest, SampleRequestForm};

#[derive(Subcommand, Debug)]
pub enum ReqCommands {
    /// List sample requests with status, date and customer filters
    List(ListArgs),

    /// Show a sample request with its fabric items
    Show(ShowArgs),

    /// Create a sample request
    New(NewArgs),

    /// Update a sample request
    Edit(EditArgs),

    /// Delete a sample request
    Delete(DeleteArgs),

    /// Move a fabric item to its next status
    Advance(TransitionArgs),

    /// Reject a fabric item
    Reject(TransitionArgs),

    /// Upload files and attach them to a request
    Attach(AttachArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Page number (1-based)
    #[arg(long, short = 'p', default_value_t = 1)]
    pub page: u32,

    /// Filter by item status (of the first item)
    #[arg(long, short = 's', value_enum, default_value_t = StatusFilter::All)]
    pub status: StatusFilter,

    /// Filter by required-by date
    #[arg(long, short = 'd', value_enum, default_value_t = DateFilter::All)]
    pub date: DateFilter,

    /// Exact buyer name, or "all"
    #[arg(long)]
    pub customer: Option<String>,

    /// Show fabric items under these request IDs
    #[arg(long, short = 'x')]
    pub expand: Vec<String>,

    /// Print the buyer names available to --customer and exit
    #[arg(long)]
    pub customers: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Sample request ID
    pub id: String,
}

/// Form fields shared by `new` and `edit`
#[derive(clap::Args, Debug, Default)]
pub struct RequestFields {
    /// Pick an active buyer by ID; fills buyer name and contact
    #[arg(long, conflicts_with = "buyer_name")]
    pub buyer: Option<String>,

    #[arg(long)]
    pub buyer_name: Option<String>,

    #[arg(long)]
    pub contact: Option<String>,

    /// Required-by date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub date: Option<chrono::NaiveDate>,

    /// LOW, MEDIUM or HIGH
    #[arg(long)]
    pub priority: Option<Priority>,

    #[arg(long)]
    pub remarks: Option<String>,

    /// Fabric line as <INVENTORY_ID>=<METERS>; repeat for more lines.
    /// Given items replace the request's current items.
    #[arg(long = "item", short = 'i', value_parser = parse_item_spec)]
    pub items: Vec<(String, Decimal)>,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: RequestFields,

    /// Files to upload and attach
    #[arg(long = "attach", short = 'a')]
    pub attach: Vec<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Sample request ID
    pub id: String,

    #[command(flatten)]
    pub fields: RequestFields,

    /// Attachment URL to drop
    #[arg(long = "remove-attachment")]
    pub remove_attachment: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Sample request ID
    pub id: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct TransitionArgs {
    /// Sample request ID
    pub id: String,

    /// Fabric item ID (optional when the request has one item)
    #[arg(long)]
    pub item: Option<String>,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(clap::Args, Debug)]
pub struct AttachArgs {
    /// Sample request ID
    pub id: String,

    /// Files to upload
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

const REQ_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 12),
    ColumnDef::new("buyer", "BUYER", 22),
    ColumnDef::new("contact", "CONTACT", 16),
    ColumnDef::new("required", "REQUIRED BY", 11),
    ColumnDef::new("priority", "PRIORITY", 8),
    ColumnDef::new("status", "STATUS", 12),
    ColumnDef::new("items", "ITEMS", 5),
];

const ITEM_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ITEM", 12),
    ColumnDef::new("fabric", "FABRIC", 22),
    ColumnDef::new("color", "COLOR", 12),
    ColumnDef::new("gsm", "GSM", 6),
    ColumnDef::new("meters", "METERS", 10),
    ColumnDef::new("status", "STATUS", 12),
];

pub async fn run(cmd: ReqCommands, config: Config, global: &GlobalOpts) -> Result<()> {
    let ctx = CliContext::new(config, global)?;
    match cmd {
        ReqCommands::List(args) => run_list(&ctx, args, global).await,
        ReqCommands::Show(args) => run_show(&ctx, args, global).await,
        ReqCommands::New(args) => run_new(&ctx, args, global).await,
        ReqCommands::Edit(args) => run_edit(&ctx, args, global).await,
        ReqCommands::Delete(args) => run_delete(&ctx, args).await,
        ReqCommands::Advance(args) => run_transition(&ctx, args, Direction::Advance).await,
        ReqCommands::Reject(args) => run_transition(&ctx, args, Direction::Reject).await,
        ReqCommands::Attach(args) => run_attach(&ctx, args, global).await,
    }
}

// =========================================================================
// List / show
// =========================================================================

fn request_to_row(request: &SampleRequest) -> TableRow {
    TableRow::new(request.id.clone())
        .cell("id", CellValue::Id(request.id.clone()))
        .cell("buyer", CellValue::Text(request.buyer_name.clone()))
        .cell("contact", CellValue::Text(request.contact_person.clone()))
        .cell("required", CellValue::Date(request.required_by_date))
        .cell("priority", CellValue::Priority(request.priority))
        .cell("status", CellValue::Status(request.current_status()))
        .cell("items", CellValue::Number(request.items.len() as u64))
}

fn item_to_row(item: &FabricItem) -> TableRow {
    let id = item.id.clone().unwrap_or_default();
    TableRow::new(id.clone())
        .cell(
            "id",
            if id.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Id(id)
            },
        )
        .cell("fabric", CellValue::Text(item.fabric_name.clone()))
        .cell("color", CellValue::Text(item.color.clone()))
        .cell("gsm", CellValue::Number(item.gsm.into()))
        .cell("meters", CellValue::Meters(item.required_meters))
        .cell("status", CellValue::Status(item.status))
}

async fn run_list(ctx: &CliContext, args: ListArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::SampleRequests)?;

    let mut view = RequestListView::new();
    view.filters.status = args.status;
    view.filters.date = args.date;
    view.filters.customer = NameFilter::from_option(args.customer.as_deref());

    ctx.console
        .load_requests(&mut view, args.page)
        .await
        .map_err(|e| ctx.fail(e))?;

    if args.customers {
        for name in view.customer_options() {
            println!("{}", name);
        }
        return Ok(());
    }

    for id in &args.expand {
        view.toggle_expanded(id);
    }

    let visible: Vec<SampleRequest> = view.visible(Utc::now()).into_iter().cloned().collect();

    let format = effective_format(global.format, true);
    if print_serialized(&visible, format)? {
        return Ok(());
    }

    let rows = visible.iter().map(request_to_row).collect();
    TableFormatter::new(REQ_COLUMNS, "sample request").output(rows, format, &[])?;

    if format != OutputFormat::Table {
        return Ok(());
    }

    for request in visible.iter().filter(|r| view.is_expanded(&r.id)) {
        println!();
        println!(
            "{} {} ({})",
            style("Items of").dim(),
            style(format_short_id(&request.id)).cyan(),
            request.buyer_name
        );
        let rows = request.items.iter().map(item_to_row).collect();
        TableFormatter::new(ITEM_COLUMNS, "fabric item").output(rows, format, &[])?;
    }

    if view.total_pages() > 1 {
        let mut hint = Vec::new();
        if view.has_prev() {
            hint.push(format!("--page {}", view.page() - 1));
        }
        if view.has_next() {
            hint.push(format!("--page {}", view.page() + 1));
        }
        println!(
            "Page {} of {} ({} total) {}",
            style(view.page()).cyan(),
            view.total_pages(),
            view.total(),
            style(hint.join(" | ")).dim()
        );
    }
    Ok(())
}

async fn run_show(ctx: &CliContext, args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::SampleRequests)?;

    let request = ctx
        .console
        .sample_request(&args.id)
        .await
        .map_err(|e| ctx.fail(e))?;

    if print_serialized(&request, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        println!("{}", request.id);
        return Ok(());
    }

    let engine = ctx.console.workflow();

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(&request.id).cyan());
    println!(
        "{}: {}",
        style("Buyer").bold(),
        style(&request.buyer_name).yellow()
    );
    println!("{}: {}", style("Contact").bold(), request.contact_person);
    println!(
        "{}: {}",
        style("Required by").bold(),
        format_date(request.required_by_date)
    );
    println!("{}: {}", style("Priority").bold(), request.priority);
    println!(
        "{}: {}",
        style("Status").bold(),
        request.current_status().label()
    );
    if let Some(remarks) = request.remarks.as_deref().filter(|r| !r.is_empty()) {
        println!("{}: {}", style("Remarks").bold(), remarks);
    }
    println!("{}", style("─".repeat(60)).dim());

    println!(
        "{} ({}, {} total)",
        style("Fabric items").bold(),
        request.items.len(),
        format_meters(request.total_meters())
    );
    for item in &request.items {
        let actions = item_actions(&engine, item);
        println!(
            "  {} {} {} {} gsm  {}  {}{}",
            style(item.id.as_deref().map(format_short_id).unwrap_or_default()).cyan(),
            item.fabric_name,
            item.color,
            item.gsm,
            format_meters(item.required_meters),
            style(item.status.label()).yellow(),
            if actions.is_empty() {
                String::new()
            } else {
                format!("  {}", style(actions).dim())
            }
        );
    }

    if !request.attachments.is_empty() {
        println!("{}", style("─".repeat(60)).dim());
        println!("{}", style("Attachments").bold());
        for url in &request.attachments {
            println!("  {}", url);
        }
    }
    if let Some(created) = request.created_at {
        println!("{}", style("─".repeat(60)).dim());
        println!(
            "{}: {}",
            style("Created").dim(),
            created.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

/// Hint at the workflow actions the signed-in role can take on an item
fn item_actions(engine: &WorkflowEngine, item: &FabricItem) -> String {
    let mut actions = Vec::new();
    if engine.can_show_advance(item.status) {
        if let Some(next) = next_status(item.status) {
            actions.push(format!("advance → {}", next.label()));
        }
    }
    if engine.can_show_reject(item.status) {
        actions.push("reject".to_string());
    }
    actions.join(", ")
}

// =========================================================================
// Create / edit / delete
// =========================================================================

impl RequestFields {
    /// Fill `form` from the flags, resolving buyer and fabric IDs
    async fn apply(self, ctx: &CliContext, form: &mut SampleRequestForm) -> Result<()> {
        if let Some(buyer_id) = self.buyer {
            let mut picker = ctx
                .console
                .buyer_autocomplete()
                .await
                .map_err(|e| ctx.fail(e))?;
            if !picker.select_into(&buyer_id, form) {
                miette::bail!(
                    help = "Run `ferp buyer active` to list active buyers",
                    "No active buyer with ID {}",
                    buyer_id
                );
            }
        }
        if let Some(v) = self.buyer_name {
            form.buyer_name = v;
        }
        if let Some(v) = self.contact {
            form.contact_person = v;
        }
        if let Some(v) = self.date {
            form.required_by_date = Some(v);
        }
        if let Some(v) = self.priority {
            form.priority = v;
        }
        if let Some(v) = self.remarks {
            form.remarks = Some(v);
        }

        if !self.items.is_empty() {
            let mut picker = ctx
                .console
                .fabric_autocomplete()
                .await
                .map_err(|e| ctx.fail(e))?;
            let mut lines = Vec::with_capacity(self.items.len());
            for (inventory_id, meters) in self.items {
                let mut line = FabricItemForm::new();
                if !picker.select_into(&inventory_id, &mut line) {
                    miette::bail!(
                        help = "Run `ferp inv search <TERM>` to find fabrics",
                        "No inventory record with ID {}",
                        inventory_id
                    );
                }
                line.set_required_meters(meters);
                lines.push(line);
            }
            form.items = lines;
        }
        Ok(())
    }
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let file = UploadFile::read(path)
            .await
            .map_err(|e| miette::miette!("Cannot read {}: {}", path.display(), e))?;
        files.push(file);
    }
    Ok(files)
}

fn print_saved(request: &SampleRequest, global: &GlobalOpts) -> Result<bool> {
    if global.format == OutputFormat::Id {
        println!("{}", request.id);
        return Ok(true);
    }
    print_serialized(request, global.format)
}

async fn run_new(ctx: &CliContext, args: NewArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::SampleRequests)?;

    let mut form = SampleRequestForm::new();
    args.fields.apply(ctx, &mut form).await?;

    // Validate before spending an upload on a form the server never sees
    if !args.attach.is_empty() {
        form.precheck().map_err(|e| ctx.fail(e))?;

        let files = read_files(&args.attach).await?;
        let urls = ctx
            .console
            .upload_attachments(files)
            .await
            .map_err(|e| ctx.fail(e))?;
        let mut attachments = AttachmentList::from(std::mem::take(&mut form.attachments));
        attachments.append(urls);
        form.attachments = attachments.into_urls();
    }

    let saved = ctx
        .console
        .save_sample_request(&FormMode::Create, &form)
        .await
        .map_err(|e| ctx.fail(e))?;

    if !print_saved(&saved.record, global)? {
        print_notice(&saved.notice);
        println!(
            "   {} for {} ({})",
            style(&saved.record.id).cyan(),
            saved.record.buyer_name,
            format_date(saved.record.required_by_date)
        );
    }
    Ok(())
}

async fn run_edit(ctx: &CliContext, args: EditArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::SampleRequests)?;

    let current = ctx
        .console
        .sample_request(&args.id)
        .await
        .map_err(|e| ctx.fail(e))?;
    let mut form = SampleRequestForm::from(&current);
    args.fields.apply(ctx, &mut form).await?;

    if !args.remove_attachment.is_empty() {
        let mut attachments = AttachmentList::from(std::mem::take(&mut form.attachments));
        for url in &args.remove_attachment {
            if !attachments.remove_url(url) {
                miette::bail!("{} is not attached to this request", url);
            }
        }
        form.attachments = attachments.into_urls();
    }

    let saved = ctx
        .console
        .save_sample_request(&FormMode::Edit(args.id), &form)
        .await
        .map_err(|e| ctx.fail(e))?;

    if !print_saved(&saved.record, global)? {
        print_notice(&saved.notice);
    }
    Ok(())
}

async fn run_delete(ctx: &CliContext, args: DeleteArgs) -> Result<()> {
    ctx.require(Section::SampleRequests)?;

    let prompt = format!("Delete sample request {}?", args.id);
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
        .delete_sample_request(&args.id)
        .await
        .map_err(|e| ctx.fail(e))?;
    print_notice(&notice);
    Ok(())
}

async fn run_attach(ctx: &CliContext, args: AttachArgs, global: &GlobalOpts) -> Result<()> {
    ctx.require(Section::SampleRequests)?;

    let current = ctx
        .console
        .sample_request(&args.id)
        .await
        .map_err(|e| ctx.fail(e))?;

    let files = read_files(&args.files).await?;
    let urls = ctx
        .console
        .upload_attachments(files)
        .await
        .map_err(|e| ctx.fail(e))?;
    let uploaded = urls.len();

    let mut form = SampleRequestForm::from(&current);
    let mut attachments = AttachmentList::from(std::mem::take(&mut form.attachments));
    attachments.append(urls);
    form.attachments = attachments.into_urls();

    let saved = ctx
        .console
        .save_sample_request(&FormMode::Edit(args.id), &form)
        .await
        .map_err(|e| ctx.fail(e))?;

    if !print_saved(&saved.record, global)? {
        print_notice(&saved.notice);
        println!(
            "   {} file(s) attached, {} total",
            uploaded,
            saved.record.attachments.len()
        );
    }
    Ok(())
}

// =========================================================================
// Item workflow
// =========================================================================

#[derive(Debug, Clone, Copy)]
enum Direction {
    Advance,
    Reject,
}

fn pick_item<'a>(request: &'a SampleRequest, item_id: Option<&str>) -> Result<&'a FabricItem> {
    match item_id {
        Some(id) => request
            .item(id)
            .ok_or_else(|| miette::miette!("Request {} has no item {}", request.id, id)),
        None => match request.items.as_slice() {
            [only] => Ok(only),
            [] => miette::bail!("Request {} has no fabric items", request.id),
            _ => miette::bail!(
                help = "Run `ferp req show <ID>` to list item IDs",
                "Request {} has {} items; pass --item",
                request.id,
                request.items.len()
            ),
        },
    }
}

async fn run_transition(ctx: &CliContext, args: TransitionArgs, direction: Direction) -> Result<()> {
    ctx.require(Section::SampleRequests)?;

    let request = ctx
        .console
        .sample_request(&args.id)
        .await
        .map_err(|e| ctx.fail(e))?;
    let item = pick_item(&request, args.item.as_deref())?;

    let engine = ctx.console.workflow();
    let plan: TransitionPlan = match direction {
        Direction::Advance => engine.plan_advance(item),
        Direction::Reject => engine.plan_reject(item),
    }
    .map_err(|e| ctx.fail(e))?;

    // Only SENT asks; without a terminal or --yes the plan stays unconfirmed
    let transition = match plan.confirmation_prompt() {
        None => plan.confirm(true),
        Some(prompt) => match ctx.confirm(&prompt, args.yes)? {
            Some(true) => plan.confirm(true),
            Some(false) => {
                println!("Aborted.");
                return Ok(());
            }
            None => plan.confirm(false),
        },
    }
    .map_err(|e| ctx.fail(e))?;

    let notice = ctx
        .console
        .execute_transition(&request.id, &transition)
        .await
        .map_err(|e| ctx.fail(e))?;
    print_notice(&notice);
    Ok(())
}
