//! Command-line front end for the contract visit engine.
//!
//! Reads `config.toml` from the config directory when present, opens the
//! SQLite contract store under the data directory, and prints results to
//! stdout. Tracing goes to stderr.

use chrono::NaiveDate;
use fieldvisit::config::FieldVisitConfig;
use fieldvisit::contract::{Contract, ContractDraft, ContractId, TechnicianId};
use fieldvisit::directory::{ContractDirectory, DirectoryView, Scope, SearchField};
use fieldvisit::error::{FieldVisitError, StoreError};
use fieldvisit::mutation::ContractMutationService;
use fieldvisit::reminder::{FileReminderLedger, ReminderDeduplicator};
use fieldvisit::schedule::ScheduledContract;
use fieldvisit::store::{ContractStore, SqliteContractStore};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("fieldvisit=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "fieldvisit failed");
        eprintln!("fieldvisit failed: {e}");
        std::process::exit(1);
    }
}

struct App {
    config: FieldVisitConfig,
    store: Arc<dyn ContractStore>,
    today: NaiveDate,
}

async fn run() -> fieldvisit::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };
    if matches!(command.as_str(), "help" | "--help" | "-h") {
        print_usage();
        return Ok(());
    }

    let config_path = FieldVisitConfig::default_config_path();
    let config = if config_path.exists() {
        FieldVisitConfig::from_file(&config_path)?
    } else {
        FieldVisitConfig::default()
    };
    let store = SqliteContractStore::open(&config.store.root_dir)?;
    let app = App {
        config,
        store: Arc::new(store),
        today: chrono::Local::now().date_naive(),
    };
    let rest = &args[1..];

    match (command.as_str(), rest) {
        ("list", [user]) => app.list(user, "").await,
        ("list", [user, query]) => app.list(user, query).await,
        ("owners", [query]) => app.owners(query).await,
        ("add", [owner, name, address]) => app.add(owner, name, address, "").await,
        ("add", [owner, name, address, visits]) => app.add(owner, name, address, visits).await,
        ("done", [owner, id]) => app.done(owner, id).await,
        ("set-last-visit", [owner, id, date]) => app.set_last_visit(owner, id, date).await,
        ("transfer", [from, id, to]) => app.transfer(from, id, to).await,
        ("delete", [owner, id]) => app.delete(owner, id).await,
        (
            "list" | "owners" | "add" | "done" | "set-last-visit" | "transfer" | "delete",
            _,
        ) => Err(FieldVisitError::Config(format!(
            "wrong arguments for `{command}` (see --help)"
        ))),
        (other, _) => Err(FieldVisitError::Config(format!(
            "unknown subcommand `{other}` (see --help)"
        ))),
    }
}

impl App {
    fn directory(&self) -> ContractDirectory {
        let directory = ContractDirectory::new(self.store.clone());
        if !self.config.reminders.enabled {
            return directory;
        }
        let ledger = FileReminderLedger::new(self.config.reminders.ledger_path.clone());
        directory.with_reminders(
            ReminderDeduplicator::new(Box::new(ledger)),
            fieldvisit::messenger::from_config(&self.config.messenger),
        )
    }

    fn mutations(&self) -> ContractMutationService {
        ContractMutationService::new(self.store.clone())
    }

    async fn fetch(&self, owner: &str, id: &str) -> fieldvisit::Result<Contract> {
        let owner = TechnicianId::new(owner);
        let id = ContractId::new(id);
        match self.store.get(&owner, &id).await? {
            Some(contract) => Ok(contract),
            None => Err(StoreError::NotFound { owner, id }.into()),
        }
    }

    async fn list(&self, user: &str, query: &str) -> fieldvisit::Result<()> {
        let scope = Scope::for_user(user, &self.config.directory);
        let mut directory = self.directory();
        let view = directory.load(scope, self.today).await?;
        print_view(&view.filter(query, SearchField::Name));
        Ok(())
    }

    async fn owners(&self, query: &str) -> fieldvisit::Result<()> {
        let mut directory = self.directory();
        let view = directory.load(Scope::All, self.today).await?;
        print_view(&view.filter(query, SearchField::Owner));
        Ok(())
    }

    async fn add(
        &self,
        owner: &str,
        name: &str,
        address: &str,
        visits: &str,
    ) -> fieldvisit::Result<()> {
        let draft = ContractDraft {
            name: name.to_owned(),
            address: address.to_owned(),
            visits: visits.to_owned(),
            ..ContractDraft::default()
        };
        let created = self
            .mutations()
            .create_contract(&TechnicianId::new(owner), draft, self.today)
            .await?;
        print_entry(&created);
        Ok(())
    }

    async fn done(&self, owner: &str, id: &str) -> fieldvisit::Result<()> {
        let contract = self.fetch(owner, id).await?;
        if !ContractMutationService::can_mark_done(&contract, self.today) {
            println!("already marked done today: {}", contract.name);
            return Ok(());
        }
        let updated = self.mutations().mark_visit_done(&contract, self.today).await?;
        print_entry(&updated);
        Ok(())
    }

    async fn set_last_visit(&self, owner: &str, id: &str, date: &str) -> fieldvisit::Result<()> {
        let contract = self.fetch(owner, id).await?;
        let updated = self
            .mutations()
            .set_last_visit(&contract, date, self.today)
            .await?;
        print_entry(&updated);
        Ok(())
    }

    async fn transfer(&self, from: &str, id: &str, to: &str) -> fieldvisit::Result<()> {
        let contract = self.fetch(from, id).await?;
        let result = self
            .mutations()
            .transfer_ownership(
                &contract,
                &TechnicianId::new(from),
                &TechnicianId::new(to),
                self.today,
            )
            .await;
        match result {
            Ok(moved) => {
                print_entry(&moved);
                Ok(())
            }
            Err(FieldVisitError::Transfer(e)) if e.is_partial() => {
                eprintln!(
                    "contract {} ({}, {}) is now in neither collection; re-add it to {}",
                    e.contract.id, e.contract.name, e.contract.address, e.from
                );
                Err(FieldVisitError::Transfer(e))
            }
            Err(e) => Err(e),
        }
    }

    async fn delete(&self, owner: &str, id: &str) -> fieldvisit::Result<()> {
        self.mutations()
            .delete_contract(&TechnicianId::new(owner), &ContractId::new(id))
            .await?;
        println!("deleted {id}");
        Ok(())
    }
}

fn print_entry(entry: &ScheduledContract) {
    println!(
        "{}\t{}\t{}\t{}\tnext: {}\t{}",
        entry.contract.id,
        entry.contract.owner,
        entry.contract.name,
        entry.contract.address,
        entry.next_visit,
        entry.status
    );
}

fn print_view(view: &DirectoryView) {
    println!(
        "{}: {} contracts ({} behind, {} due, {} up to date)",
        view.scope,
        view.counts.total,
        view.counts.behind,
        view.counts.due,
        view.counts.up_to_date
    );
    for entry in &view.entries {
        print_entry(entry);
    }
    for reminder in &view.reminders {
        println!("reminder {}: {:?}", reminder.technician, reminder.dispatch);
    }
}

fn print_usage() {
    println!(
        "usage: fieldvisit <command>\n\
         \n\
         commands:\n  \
           list <user> [query]                      contracts visible to <user>, filtered by name\n  \
           owners <query>                           all contracts, filtered by technician\n  \
           add <owner> <name> <address> [visits]    create a contract\n  \
           done <owner> <id>                        mark today's visit done\n  \
           set-last-visit <owner> <id> <dd/MM/yyyy> set the last visit date\n  \
           transfer <from> <id> <to>                move a contract to another technician\n  \
           delete <owner> <id>                      remove a contract"
    );
}
