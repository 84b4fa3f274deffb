use clap::Parser;
use six_wraps::api::{endpoints, JobFilter};
use six_wraps::config::{
    Cli, Command, InviteAction, JobAction, ListArgs, RecoverAction, UserAction,
};
use six_wraps::core::export::{
    write_csv_file, ExportRow, JobExport, CUSTOMER_COLUMNS, JOB_COLUMNS,
};
use six_wraps::core::importer::import_into_sqlite;
use six_wraps::core::list_view::{ListPage, ListState, Sort, SortDirection};
use six_wraps::core::once::{InviteFlow, RecoverPasswordFlow};
use six_wraps::core::retry::FetchState;
use six_wraps::core::session::{AuthAction, Session};
use six_wraps::domain::model::{AuthPayload, Metadata, NewInvite, Pagination};
use six_wraps::domain::ports::MetadataCache;
use six_wraps::utils::error::{AppError, ErrorSeverity};
use six_wraps::utils::format::{number_with_commas, to_title_case, truncate_string};
use six_wraps::utils::{logger, validation::Validate};
use six_wraps::{
    ApiClient, AppConfig, CsvUserImport, FileMetadataCache, ImportEngine, InMemoryUserStore,
    LocalStorage, MetadataFetcher, Result,
};
use std::path::Path;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting six-wraps CLI");

    let mut config = match AppConfig::load_or_default(&cli.config) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    cli.apply_overrides(&mut config);
    if cli.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    if let Err(e) = run(&cli, &config).await {
        fail(&e);
    }
}

fn fail(e: &AppError) -> ! {
    tracing::error!(
        "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn run(cli: &Cli, config: &AppConfig) -> Result<()> {
    match &cli.command {
        Command::ImportUsers { dry_run, .. } => import_users(config, *dry_run).await,
        Command::Login { email, password } => login(config, email, password).await,
        Command::Logout => {
            let mut session = Session::new(state_storage(config));
            session.restore().await?;
            session.dispatch(AuthAction::Logout).await?;
            println!("👋 Logged out");
            Ok(())
        }
        Command::Profile => {
            let client = authed_client(cli, config).await?;
            let profile = client.profile().await?.data;
            match profile.user {
                Some(user) => {
                    println!("{} <{}>", user.full_name(), user.email);
                    println!("Role: {}", to_title_case(&user.role));
                    if let Some(org) = &user.organization {
                        println!("Organization: {}", org.name);
                    }
                }
                None => println!("No profile returned"),
            }
            Ok(())
        }
        Command::Theme { theme } => {
            let client = authed_client(cli, config).await?;
            client.update_theme(*theme).await?;
            let mut session = Session::new(state_storage(config));
            session.dispatch(AuthAction::TriggerTheme(Some(*theme))).await?;
            println!("🎨 Theme set to {:?}", session.state().theme);
            Ok(())
        }
        Command::Refresh => {
            let mut session = Session::new(state_storage(config));
            let refresh_token = session
                .restore()
                .await?
                .map(|t| t.refresh_token)
                .filter(|t| !t.is_empty())
                .ok_or(AppError::NotAuthenticated)?;
            let client = ApiClient::new(&config.api.base_url(), config.api.timeout())?;
            let mut payload = client.refresh_session(&refresh_token).await?.data;
            if payload.refresh_token.is_empty() {
                payload.refresh_token = refresh_token;
            }
            session.dispatch(AuthAction::Login(payload)).await?;
            println!("🔄 Session refreshed");
            Ok(())
        }
        Command::SwitchOrg {
            organization_id,
            franchise_id,
        } => {
            let client = authed_client(cli, config).await?;
            let payload = client
                .switch_organization(organization_id, franchise_id)
                .await?
                .data;
            save_session(config, payload).await?;
            println!("✅ Switched to franchise {}", franchise_id);
            Ok(())
        }
        Command::RecoverPassword { action } => recover_password(config, action).await,
        Command::Metadata => {
            let client = authed_client(cli, config).await?;
            let metadata = fetch_metadata(client, config).await?;
            print_metadata(&metadata);
            Ok(())
        }
        Command::Jobs {
            status,
            interval,
            customer,
            view,
            export,
        } => {
            let client = authed_client(cli, config).await?;
            let filter = JobFilter {
                status: status.clone(),
                interval: *interval,
                customer: customer.clone(),
                ..Default::default()
            }
            .unpaged();
            let jobs = client.list_jobs(&filter).await?.data;
            let metadata = cached_metadata(config).await;
            let state = list_state(view, config);

            let page = state.apply(&jobs);
            for &job in &page.items {
                let row = JobExport {
                    job,
                    metadata: metadata.as_ref(),
                };
                println!(
                    "{:<12} {:<24} {:<32} {:>10} {}",
                    job.job_id.as_deref().unwrap_or("-"),
                    truncate_string(&job.customer.full_name(), 24),
                    truncate_string(&job.service_names(), 32),
                    job.payment_amount.map(number_with_commas).unwrap_or_default(),
                    row.cell("status"),
                );
            }
            print_footer(&page);

            if let Some(path) = export {
                let rows: Vec<JobExport> = state
                    .matching(&jobs)
                    .into_iter()
                    .map(|job| JobExport {
                        job,
                        metadata: metadata.as_ref(),
                    })
                    .collect();
                let written = write_csv_file(&LocalStorage::new("."), path, &rows, &JOB_COLUMNS).await?;
                println!("📁 Exported {} jobs to {}", written, path);
            }
            Ok(())
        }
        Command::Job { action } => {
            let client = authed_client(cli, config).await?;
            let response = match action {
                JobAction::Delete { id } => client.delete_job(id).await?,
                JobAction::Invoice { id } => client.send_invoice(id).await?,
            };
            println!("{}", response.message);
            Ok(())
        }
        Command::SearchCustomers { term } => {
            let client = authed_client(cli, config).await?;
            let customers = client.search_customers(term).await?.data;
            for customer in &customers {
                println!(
                    "{:<28} {:<32} {}",
                    truncate_string(&customer.full_name(), 28),
                    truncate_string(&customer.email, 32),
                    customer.phone
                );
            }
            println!("{} found", customers.len());
            Ok(())
        }
        Command::Customers { view, export } => {
            let client = authed_client(cli, config).await?;
            let customers = client.list_customers(&Default::default()).await?.data;
            let state = list_state(view, config);

            let page = state.apply(&customers);
            for customer in &page.items {
                println!(
                    "{:<28} {:<32} {:<16} {:>5}",
                    truncate_string(&customer.full_name(), 28),
                    truncate_string(&customer.email, 32),
                    customer.phone,
                    customer.total_jobs
                );
            }
            print_footer(&page);

            if let Some(path) = export {
                let rows: Vec<_> = state.matching(&customers).into_iter().cloned().collect();
                let written =
                    write_csv_file(&LocalStorage::new("."), path, &rows, &CUSTOMER_COLUMNS).await?;
                println!("📁 Exported {} customers to {}", written, path);
            }
            Ok(())
        }
        Command::Services { inactive, view } => {
            let client = authed_client(cli, config).await?;
            let services = client.list_services(*inactive).await?.data;
            let page = list_state(view, config).apply(&services);
            for service in &page.items {
                println!(
                    "{:<32} {:<10} {} sub-services",
                    truncate_string(&service.name, 32),
                    service.status_label(),
                    service.sub_services.len()
                );
            }
            print_footer(&page);
            Ok(())
        }
        Command::ToggleService { id } => {
            let response = authed_client(cli, config).await?.toggle_service_status(id).await?;
            println!("{}", response.message);
            Ok(())
        }
        Command::User {
            action: UserAction::Remove { id },
        } => {
            let response = authed_client(cli, config).await?.remove_franchise_user(id).await?;
            println!("{}", response.message);
            Ok(())
        }
        Command::Users { view } => {
            let client = authed_client(cli, config).await?;
            let users = client.list_franchise_users().await?.data;
            let page = list_state(view, config).apply(&users);
            for user in &page.items {
                println!(
                    "{:<28} {:<32} {}",
                    truncate_string(&user.full_name(), 28),
                    truncate_string(&user.email, 32),
                    to_title_case(&user.role)
                );
            }
            print_footer(&page);
            Ok(())
        }
        Command::Invites { view } => {
            let client = authed_client(cli, config).await?;
            let limit = view.limit.unwrap_or(config.list.limit);
            let response = client.list_invites(view.page, limit).await?;

            // The API already paged; only search and sort happen here.
            let mut state = list_state(view, config);
            state.set_page(1);
            let page = state.apply(&response.data);
            for invite in &page.items {
                println!(
                    "{:<28} {:<32} {}",
                    truncate_string(&invite.full_name(), 28),
                    truncate_string(&invite.email, 32),
                    invite.token
                );
            }
            print_pagination(response.pagination.as_ref(), page.items.len());
            Ok(())
        }
        Command::Invite { action } => invite(cli, config, action).await,
        Command::Analytics { interval } => {
            let client = authed_client(cli, config).await?;
            for endpoint in endpoints::ANALYTICS_ALL {
                let response = client.analytics(endpoint, *interval).await?;
                println!("{}", endpoint);
                println!("{}", serde_json::to_string_pretty(&response.data)?);
            }
            Ok(())
        }
    }
}

async fn import_users(config: &AppConfig, dry_run: bool) -> Result<()> {
    let import = &config.import;
    let report = if dry_run {
        tracing::info!("Dry run: users go to an in-memory store");
        let pipeline = CsvUserImport::new(&import.csv_path, InMemoryUserStore::new())
            .with_demo_password(&import.demo_password);
        ImportEngine::new(pipeline).run().await?
    } else {
        import_into_sqlite(
            Path::new(&import.csv_path),
            &import.database_url,
            &import.demo_password,
        )
        .await?
    };

    println!("✅ {} users imported successfully.", report.imported);
    if report.skipped_short + report.skipped_duplicate > 0 {
        println!(
            "Skipped {} short rows and {} existing emails",
            report.skipped_short, report.skipped_duplicate
        );
    }
    Ok(())
}

async fn login(config: &AppConfig, email: &str, password: &str) -> Result<()> {
    let client = ApiClient::new(&config.api.base_url(), config.api.timeout())?;
    let payload = client.login(email, password).await?.data;
    let name = payload
        .user
        .as_ref()
        .map(|u| u.full_name())
        .unwrap_or_else(|| email.to_string());

    save_session(config, payload).await?;
    println!("✅ Logged in as {}", name);
    Ok(())
}

async fn save_session(config: &AppConfig, payload: AuthPayload) -> Result<()> {
    let mut session = Session::new(state_storage(config));
    session.dispatch(AuthAction::Login(payload)).await
}

async fn recover_password(config: &AppConfig, action: &RecoverAction) -> Result<()> {
    let client = ApiClient::new(&config.api.base_url(), config.api.timeout())?;
    match action {
        RecoverAction::Request { email } => {
            let response = client.request_password_recovery(email).await?;
            println!("✉️  {}", response.message);
        }
        RecoverAction::Check { token } => {
            if RecoverPasswordFlow::new(&client).check(token).await?.is_some() {
                println!("Recovery token is valid");
            }
        }
        RecoverAction::Set { token, password } => {
            RecoverPasswordFlow::new(&client).check(token).await?;
            let response = client.recover_password(token, password).await?;
            println!("✅ {}", response.message);
        }
    }
    Ok(())
}

async fn invite(cli: &Cli, config: &AppConfig, action: &InviteAction) -> Result<()> {
    match action {
        InviteAction::Check { token } => {
            let client = ApiClient::new(&config.api.base_url(), config.api.timeout())?
                .with_token(cli.token.clone());
            let flow = InviteFlow::new(&client);
            if let Some(check) = flow.check(token).await? {
                if check.user_exists {
                    println!("Invite belongs to an existing user; log in to accept it");
                } else {
                    println!(
                        "Invite for {} is valid",
                        check.email.as_deref().unwrap_or("(no email)")
                    );
                }
            }
        }
        InviteAction::Create {
            email,
            first_name,
            last_name,
            role,
        } => {
            let client = authed_client(cli, config).await?;
            let invite = NewInvite {
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                role: role.clone(),
            };
            let created = client.create_invite(&invite).await?;
            println!("✉️  Invite sent to {} ({})", created.data.email, created.data.token);
        }
        InviteAction::Accept { token, password } => {
            let client = ApiClient::new(&config.api.base_url(), config.api.timeout())?;
            let check = InviteFlow::new(&client).check(token).await?;
            if check.is_some_and(|c| c.user_exists) {
                println!("Invite belongs to an existing user; log in to accept it");
                return Ok(());
            }
            let payload = client.accept_invite(token, password).await?.data;
            save_session(config, payload).await?;
            println!("✅ Invite accepted, you are now logged in");
        }
        InviteAction::Resend { token } => {
            let response = authed_client(cli, config).await?.resend_invite(token).await?;
            println!("{}", response.message);
        }
        InviteAction::Delete { token } => {
            let response = authed_client(cli, config).await?.delete_invite(token).await?;
            println!("{}", response.message);
        }
    }
    Ok(())
}

fn state_storage(config: &AppConfig) -> LocalStorage {
    LocalStorage::new(&config.storage.state_dir)
}

/// Client carrying `--token`, or else the saved session token.
async fn authed_client(cli: &Cli, config: &AppConfig) -> Result<ApiClient> {
    let token = match &cli.token {
        Some(token) => Some(token.clone()),
        None => {
            let mut session = Session::new(state_storage(config));
            session.restore().await?.map(|t| t.token)
        }
    };
    let token = token.filter(|t| !t.is_empty()).ok_or(AppError::NotAuthenticated)?;

    Ok(ApiClient::new(&config.api.base_url(), config.api.timeout())?.with_token(Some(token)))
}

async fn fetch_metadata(client: ApiClient, config: &AppConfig) -> Result<Metadata> {
    let token = client.token().map(str::to_string);
    let cache = FileMetadataCache::new(state_storage(config));
    let fetcher = MetadataFetcher::new(client, cache, config.api.retry_policy());

    let mut updates = fetcher.subscribe();
    let progress = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            match state {
                FetchState::Retrying {
                    attempt,
                    error,
                    delay,
                } => eprintln!("⏳ Attempt {} failed ({}), retrying in {:?}", attempt, error, delay),
                FetchState::Failed { attempts, .. } => {
                    eprintln!("❌ Giving up after {} attempts", attempts)
                }
                _ => {}
            }
        }
    });

    let result = fetcher.fetch(token.as_deref()).await;
    drop(fetcher);
    let _ = progress.await;
    result
}

async fn cached_metadata(config: &AppConfig) -> Option<Metadata> {
    match FileMetadataCache::new(state_storage(config)).load().await {
        Ok(metadata) => metadata,
        Err(e) => {
            tracing::warn!("Ignoring unreadable metadata cache: {}", e);
            None
        }
    }
}

fn list_state(view: &ListArgs, config: &AppConfig) -> ListState {
    let mut state = ListState::new(view.limit.unwrap_or(config.list.limit));
    if let Some(search) = &view.search {
        state.set_search(search.clone());
    }
    if let Some(field) = &view.sort {
        state.set_sort(Some(Sort {
            field: field.clone(),
            direction: if view.desc {
                SortDirection::Desc
            } else {
                SortDirection::Asc
            },
        }));
    }
    state.set_page(view.page);
    state
}

fn print_metadata(metadata: &Metadata) {
    if !metadata.promotional_message.is_empty() {
        println!("{}", metadata.promotional_message);
    }
    println!("Statuses:");
    for status in &metadata.statuses {
        println!("  {:<20} {}", status.value, status.label);
    }
}

fn print_footer<T>(page: &ListPage<'_, T>) {
    println!(
        "Page {} of {} ({} matching)",
        page.page,
        page.total_pages.max(1),
        page.total_filtered
    );
}

fn print_pagination(pagination: Option<&Pagination>, shown: usize) {
    match pagination {
        Some(p) => println!(
            "Page {} of {} ({} total)",
            p.page,
            p.total_pages.max(1),
            p.total_data
        ),
        None => println!("{} shown", shown),
    }
}
