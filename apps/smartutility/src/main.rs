use std::io::BufRead;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use runtime::{AppConfig, CliArgs};
use utility_accounts::config::UtilityAccountsConfig;
use utility_accounts::contract::client::UtilityAccountsApi;
use utility_accounts::contract::model::{
    ActivityRecord, FeedbackForm, LimitSettings, NewAccount, NotificationChannel, PaymentRequest,
    ProfilePatch, ServiceKind, TransactionRecord,
};
use utility_accounts::UtilityAccounts;

const MODULE_NAME: &str = "utility_accounts";

/// SmartUtility - utility bill accounts, payments and usage alerts
#[derive(Parser)]
#[command(name = "smartutility")]
#[command(about = "SmartUtility - utility bill accounts, payments and usage alerts")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path of the JSON store file (overrides config)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and log in
    Register(RegisterArgs),
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Change fields of the logged-in user's profile
    UpdateProfile(ProfileArgs),
    /// Pay a bill for one of your meters
    Pay {
        #[arg(long)]
        bill_no: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value = "upi")]
        payment_type: String,
        #[arg(long, default_value = "")]
        area: String,
    },
    /// Save consumption limits and send alerts
    SetLimits(LimitArgs),
    /// Show a meter reading
    Meter {
        #[arg(long, value_enum)]
        kind: Kind,
        /// Defaults to the logged-in user's meter
        #[arg(long)]
        meter_no: Option<String>,
        #[arg(long)]
        consumer: Option<String>,
    },
    /// Submit service feedback
    Feedback(FeedbackArgs),
    /// Send a one-time code; with --verify, read the code from stdin and check it
    Otp {
        #[arg(long, value_enum)]
        channel: Channel,
        #[arg(long)]
        contact: String,
        #[arg(long)]
        verify: bool,
    },
    /// Show your payments and activities
    History,
    /// Admin dashboard
    #[command(subcommand)]
    Admin(AdminCommands),
    /// Check configuration and store
    Check,
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long, default_value = "")]
    mobile: String,
    #[arg(long, default_value = "")]
    dob: String,
    #[arg(long, default_value = "")]
    area: String,
    #[arg(long)]
    water_meter: String,
    #[arg(long)]
    electricity_meter: String,
}

#[derive(Args)]
struct ProfileArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    mobile: Option<String>,
    #[arg(long)]
    dob: Option<String>,
    #[arg(long)]
    area: Option<String>,
    #[arg(long)]
    water_meter: Option<String>,
    #[arg(long)]
    electricity_meter: Option<String>,
}

#[derive(Args)]
struct LimitArgs {
    #[arg(long)]
    electricity_meter: String,
    #[arg(long)]
    electricity_limit: String,
    #[arg(long)]
    water_meter: String,
    #[arg(long, default_value = "")]
    water_limit: String,
    #[arg(long, default_value_t = 24)]
    reminder_hours: u32,
    #[arg(long, default_value_t = 1)]
    snooze_hours: u32,
    /// Do not send SMS alerts
    #[arg(long)]
    no_sms: bool,
    /// Do not send email alerts
    #[arg(long)]
    no_email: bool,
}

#[derive(Args)]
struct FeedbackArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    services: String,
    #[arg(long, default_value = "")]
    performance: String,
    /// Interface rating, 1 to 5
    #[arg(long)]
    rating: u8,
    #[arg(long, default_value = "")]
    comment: String,
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Totals and average rating
    Overview,
    Users,
    Activities,
    Transactions,
    Feedbacks,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Electricity,
    Water,
}

impl From<Kind> for ServiceKind {
    fn from(k: Kind) -> Self {
        match k {
            Kind::Electricity => ServiceKind::Electricity,
            Kind::Water => ServiceKind::Water,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Channel {
    Sms,
    Email,
}

impl From<Channel> for NotificationChannel {
    fn from(c: Channel) -> Self {
        match c {
            Channel::Sms => NotificationChannel::Sms,
            Channel::Email => NotificationChannel::Email,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        store: cli.store.clone(),
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.home_dir));
    tracing::debug!(home_dir = %config.home_dir, "SmartUtility starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let module_cfg: UtilityAccountsConfig = config.module_config(MODULE_NAME)?;
    let store = kv_store::build_store(&config.storage, &config.home_path())?;
    let accounts = UtilityAccounts::build(&module_cfg, store)?;
    let api = accounts.client();

    let command = cli.command.unwrap_or(Commands::Whoami);
    run_command(&config, api.as_ref(), command).await
}

async fn run_command(
    config: &AppConfig,
    api: &dyn UtilityAccountsApi,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::Register(a) => {
            let user = api
                .register(NewAccount {
                    name: a.name,
                    email: a.email,
                    password: a.password,
                    mobile: a.mobile,
                    dob: a.dob,
                    area: a.area,
                    water_meter_no: a.water_meter,
                    electricity_meter_no: a.electricity_meter,
                })
                .await?;
            println!("Registered and logged in as {} ({})", user.name, user.email);
        }
        Commands::Login { email, password } => {
            if !api.login(&email, &password).await? {
                return Err(anyhow!("Invalid email or password"));
            }
            let user = api
                .current_user()
                .await
                .ok_or_else(|| anyhow!("Session was not established"))?;
            println!("Logged in as {} ({})", user.name, user.email);
        }
        Commands::Logout => {
            api.logout().await?;
            println!("Logged out");
        }
        Commands::Whoami => match api.current_user().await {
            Some(user) => {
                println!("{} <{}>", user.name, user.email);
                println!("  id:                {}", user.id);
                println!("  mobile:            {}", user.mobile);
                println!("  area:              {}", user.area);
                println!("  electricity meter: {}", user.electricity_meter_no);
                println!("  water meter:       {}", user.water_meter_no);
            }
            None => println!("Not logged in"),
        },
        Commands::UpdateProfile(p) => {
            let patch = ProfilePatch {
                name: p.name,
                email: p.email,
                mobile: p.mobile,
                dob: p.dob,
                area: p.area,
                water_meter_no: p.water_meter,
                electricity_meter_no: p.electricity_meter,
            };
            match api.update_profile(patch).await? {
                Some(user) => println!("Profile updated for {}", user.email),
                None => return Err(anyhow!("Not logged in")),
            }
        }
        Commands::Pay {
            bill_no,
            amount,
            payment_type,
            area,
        } => {
            let txn = api
                .pay_bill(PaymentRequest {
                    bill_no,
                    amount,
                    payment_type,
                    area,
                })
                .await?;
            println!(
                "Payment {} completed: {} bill {} amount {}",
                txn.id, txn.service_type, txn.bill_no, txn.amount
            );
        }
        Commands::SetLimits(l) => {
            let outcomes = api
                .set_limits(LimitSettings {
                    electricity_meter_no: l.electricity_meter,
                    electricity_limit: l.electricity_limit,
                    water_meter_no: l.water_meter,
                    water_limit: l.water_limit,
                    reminder_hours: l.reminder_hours,
                    snooze_hours: l.snooze_hours,
                    notify_phone: !l.no_sms,
                    notify_email: !l.no_email,
                })
                .await?;
            println!("Limits saved");
            for o in outcomes {
                let status = if o.dispatch.success { "sent" } else { "failed" };
                println!(
                    "  {} alert to {} ({}): {} - {}",
                    o.kind, o.contact, o.channel, status, o.dispatch.message
                );
            }
        }
        Commands::Meter {
            kind,
            meter_no,
            consumer,
        } => {
            let kind = ServiceKind::from(kind);
            let user = api.current_user().await;
            let meter_no = meter_no
                .or_else(|| user.as_ref().map(|u| u.meter_no(kind).to_string()))
                .ok_or_else(|| anyhow!("--meter-no is required when not logged in"))?;
            let consumer = consumer
                .or_else(|| user.as_ref().map(|u| u.name.clone()))
                .unwrap_or_default();
            let r = api.view_meter_reading(kind, &meter_no, &consumer).await?;
            println!("{} meter {} ({})", r.kind, r.meter_no, r.status);
            println!("  consumer:     {}", r.consumer_name);
            println!("  current:      {} {}", r.current_reading, kind.unit());
            println!("  last:         {} {}", r.last_reading, kind.unit());
            println!("  consumption:  {} {}", r.consumption, kind.unit());
            println!("  bill:         {}", r.bill);
            println!("  daily avg:    {} {}", r.avg_daily, kind.unit());
            println!("  peak hours:   {}", r.peak_hours);
            println!("  efficiency:   {}", r.efficiency);
        }
        Commands::Feedback(f) => {
            let receipt = api
                .submit_feedback(FeedbackForm {
                    name: f.name,
                    email: f.email,
                    services_used: f.services,
                    performance: f.performance,
                    interface_rating: f.rating,
                    overall_feedback: f.comment,
                })
                .await?;
            println!("Feedback {} received", receipt.record.id);
            match receipt.confirmation {
                Some(d) => println!("  {}", d.message),
                None => println!("  confirmation email could not be sent"),
            }
        }
        Commands::Otp {
            channel,
            contact,
            verify,
        } => {
            let out = api.request_otp(channel.into(), &contact).await?;
            println!("{}", out.message);
            if !out.success {
                return Err(anyhow!("OTP was not sent"));
            }
            if verify {
                let mut line = String::new();
                std::io::stdin().lock().read_line(&mut line)?;
                if api.verify_otp(&contact, line.trim()).await {
                    println!("OTP verified");
                } else {
                    return Err(anyhow!("OTP verification failed"));
                }
            } else if let Some(code) = out.code {
                println!("Code: {code}");
            }
        }
        Commands::History => {
            let txns = api.my_transactions().await?;
            println!("Transactions ({}):", txns.len());
            print_transactions(&txns);
            let activities = api.my_activities().await?;
            println!("Activities ({}):", activities.len());
            print_activities(&activities);
        }
        Commands::Admin(cmd) => run_admin(api, cmd).await?,
        Commands::Check => check_config(config)?,
    }
    Ok(())
}

async fn run_admin(api: &dyn UtilityAccountsApi, cmd: AdminCommands) -> Result<()> {
    match cmd {
        AdminCommands::Overview => {
            let o = api.admin_overview().await?;
            println!("Total users:      {}", o.total_users);
            println!("Total feedbacks:  {}", o.total_feedbacks);
            println!("Average rating:   {:.1}", o.avg_rating);
            println!("Electricity use:  {} kWh", o.electricity_usage_kwh);
            println!("Water use:        {} L", o.water_usage_liters);
        }
        AdminCommands::Users => {
            for u in api.admin_users().await? {
                println!(
                    "{}  {} <{}>  area={}  ele={}  wat={}  joined {}",
                    u.id,
                    u.name,
                    u.email,
                    u.area,
                    u.electricity_meter_no,
                    u.water_meter_no,
                    u.created_at.format("%Y-%m-%d")
                );
            }
        }
        AdminCommands::Activities => print_activities(&api.admin_activities().await?),
        AdminCommands::Transactions => print_transactions(&api.admin_transactions().await?),
        AdminCommands::Feedbacks => {
            for f in api.admin_feedbacks().await? {
                println!(
                    "{}  {} <{}>  {}  {}/5  {}",
                    f.created_at.format("%Y-%m-%d %H:%M"),
                    f.name,
                    f.email,
                    f.services_used,
                    f.interface_rating,
                    f.overall_feedback
                );
            }
        }
    }
    Ok(())
}

fn print_transactions(txns: &[TransactionRecord]) {
    for t in txns {
        println!(
            "  {}  {}  {}  {}  {}  {:?}",
            t.timestamp.format("%Y-%m-%d %H:%M"),
            t.id,
            t.service_type,
            t.bill_no,
            t.amount,
            t.status
        );
    }
}

fn print_activities(activities: &[ActivityRecord]) {
    for a in activities {
        println!(
            "  {}  {}  {}: {}",
            a.timestamp.format("%Y-%m-%d %H:%M"),
            a.user_email,
            a.action,
            a.details
        );
    }
}

/// Reaching this point means the config parsed and the store opened.
fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
