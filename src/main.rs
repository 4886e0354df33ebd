//! agenda - command-line client for the Agenda contacts service
//!
//! Subcommands map one-to-one onto store actions and render snapshots of
//! store state; all decision logic lives in the store, the service client,
//! and the validators.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

mod api;
mod config;
mod format;
mod models;
mod store;
mod validate;

use api::{ApiClient, ApiError};
use config::Config;
use models::{CategoryRequest, Contact, ContactRequest, FilterUpdate};
use store::Store;

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Command-line client for the Agenda contacts service")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new config file
    Init {
        /// Output path for config file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store a bearer token for the service
    Login {
        #[arg(long)]
        token: String,
    },

    /// Drop the stored bearer token
    Logout,

    /// Check the service status endpoint
    Status,

    /// List contacts, one page at a time
    List {
        #[arg(short, long, default_value_t = 0)]
        page: u32,

        /// Page size (defaults to the configured one)
        #[arg(short, long)]
        size: Option<u32>,

        /// Only contacts in this category; results are unpaged, so this
        /// cannot be combined with --page or --size
        #[arg(long, conflicts_with_all = ["page", "size"])]
        categoria: Option<i64>,
    },

    /// Show one contact in full
    Show { id: i64 },

    /// Create a contact
    Add {
        #[arg(long)]
        nombre: String,
        #[arg(long)]
        apellido: Option<String>,
        #[arg(long)]
        telefono: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        direccion: Option<String>,
        /// Birth date, YYYY-MM-DD
        #[arg(long)]
        fecha_nacimiento: Option<NaiveDate>,
        #[arg(long)]
        notas: Option<String>,
        /// Category id
        #[arg(long)]
        categoria: Option<i64>,
        #[arg(long)]
        favorito: bool,
    },

    /// Update a contact; unset flags keep their current value
    Edit {
        id: i64,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        apellido: Option<String>,
        #[arg(long)]
        telefono: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        direccion: Option<String>,
        /// Birth date, YYYY-MM-DD
        #[arg(long)]
        fecha_nacimiento: Option<NaiveDate>,
        #[arg(long)]
        notas: Option<String>,
        /// Category id
        #[arg(long)]
        categoria: Option<i64>,
        #[arg(long)]
        favorito: Option<bool>,
    },

    /// Delete a contact
    Rm {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Search contacts by free text
    Search { term: String },

    /// List favorite contacts
    Favorites,

    /// Mark a contact as favorite
    Fav { id: i64 },

    /// Unmark a contact as favorite
    Unfav { id: i64 },

    /// Show aggregate statistics
    Stats,

    /// Manage categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Show or change configuration values
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories
    List,

    /// Create a category
    Add {
        #[arg(long)]
        nombre: String,
        /// 6-digit hex color, e.g. #3498db
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        descripcion: Option<String>,
    },

    /// Update a category
    Edit {
        id: i64,
        #[arg(long)]
        nombre: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        descripcion: Option<String>,
    },

    /// Delete a category
    Rm {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the active configuration
    Show,

    /// Set a value: url, theme, language or page-size
    Set { key: String, value: String },
}

const LOGIN_HINT: &str =
    "La sesión expiró. Guarda un token nuevo con: agenda login --token <token>";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("agenda=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };

    match cli.command {
        Commands::Init { output } => {
            let path = output.unwrap_or(config_path);
            Config::default().save_to(&path)?;
            println!("Created config file: {}", path.display());
            println!();
            println!("Next steps:");
            println!("  1. Point it at your server: agenda config set url <url>");
            println!("  2. Store your token: agenda login --token <token>");
            Ok(())
        }

        Commands::Login { token } => {
            let mut cfg = load_config(&config_path)?;
            cfg.auth.token = Some(token);
            cfg.save_to(&config_path)?;
            println!("Token guardado en {}", config_path.display());
            Ok(())
        }

        Commands::Logout => {
            config::clear_token(&config_path)?;
            println!("Token eliminado.");
            Ok(())
        }

        Commands::Status => {
            let store = build_store(&config_path)?;
            let status = store.api().status().await.map_err(action_error)?;
            println!(
                "{} ({}) - {}",
                status.service, status.status, status.timestamp
            );
            Ok(())
        }

        Commands::List {
            page,
            size,
            categoria,
        } => {
            let cfg = load_config(&config_path)?;
            let size = size.unwrap_or(cfg.ui.page_size);
            let store = store_from(cfg, &config_path)?;

            match categoria {
                Some(category_id) => {
                    store.set_filters(FilterUpdate {
                        category: Some(Some(category_id)),
                        ..Default::default()
                    });
                    store.load_contacts_by_category(category_id).await;
                }
                None => store.load_contacts(page, size).await,
            }
            check_read(&store)?;

            let state = store.state();
            print_contact_table(&state.contacts);
            let p = state.pagination;
            if p.total_pages > 1 {
                println!(
                    "Página {} de {} ({} contactos)",
                    p.page + 1,
                    p.total_pages,
                    p.total_elements
                );
            }
            Ok(())
        }

        Commands::Show { id } => {
            let store = build_store(&config_path)?;

            store.load_contact(id).await;
            check_read(&store)?;

            match store.state().current_contact {
                Some(contact) => print_contact_detail(&contact),
                None => bail!("El recurso solicitado no fue encontrado."),
            }
            Ok(())
        }

        Commands::Add {
            nombre,
            apellido,
            telefono,
            email,
            direccion,
            fecha_nacimiento,
            notas,
            categoria,
            favorito,
        } => {
            let data = ContactRequest {
                nombre,
                apellido,
                telefono,
                email,
                direccion,
                fecha_nacimiento,
                notas,
                categoria_id: categoria,
                favorito,
            };
            check_valid(validate::validate_contact(&data))?;

            let store = build_store(&config_path)?;
            let created = store.create_contact(&data).await.map_err(action_error)?;
            println!(
                "Contacto creado exitosamente: {} (id {})",
                format::full_name(&created.nombre, created.apellido.as_deref()),
                created.id
            );
            Ok(())
        }

        Commands::Edit {
            id,
            nombre,
            apellido,
            telefono,
            email,
            direccion,
            fecha_nacimiento,
            notas,
            categoria,
            favorito,
        } => {
            let store = build_store(&config_path)?;

            store.load_contact(id).await;
            check_read(&store)?;
            let current = store
                .state()
                .current_contact
                .context("El recurso solicitado no fue encontrado.")?;

            let mut data = ContactRequest::from_contact(&current);
            if let Some(v) = nombre {
                data.nombre = v;
            }
            if let Some(v) = apellido {
                data.apellido = Some(v);
            }
            if let Some(v) = telefono {
                data.telefono = v;
            }
            if let Some(v) = email {
                data.email = Some(v);
            }
            if let Some(v) = direccion {
                data.direccion = Some(v);
            }
            if let Some(v) = fecha_nacimiento {
                data.fecha_nacimiento = Some(v);
            }
            if let Some(v) = notas {
                data.notas = Some(v);
            }
            if let Some(v) = categoria {
                data.categoria_id = Some(v);
            }
            if let Some(v) = favorito {
                data.favorito = v;
            }
            check_valid(validate::validate_contact(&data))?;

            let updated = store.update_contact(id, &data).await.map_err(action_error)?;
            println!(
                "Contacto actualizado exitosamente: {}",
                format::full_name(&updated.nombre, updated.apellido.as_deref())
            );
            Ok(())
        }

        Commands::Rm { id, yes } => {
            if !yes && !confirm(&format!("¿Eliminar el contacto {id}?"))? {
                println!("Cancelado.");
                return Ok(());
            }
            let store = build_store(&config_path)?;
            store.delete_contact(id).await.map_err(action_error)?;
            println!("Contacto eliminado exitosamente.");
            Ok(())
        }

        Commands::Search { term } => {
            let store = build_store(&config_path)?;

            store.set_filters(FilterUpdate {
                search_term: Some(term.clone()),
                ..Default::default()
            });
            store.search_contacts(&term).await;
            check_read(&store)?;

            let state = store.state();
            if state.contacts.is_empty() {
                println!("Sin resultados para \"{term}\".");
            } else {
                print_contact_table(&state.contacts);
            }
            Ok(())
        }

        Commands::Favorites => {
            let store = build_store(&config_path)?;
            store.set_filters(FilterUpdate {
                favorites: Some(true),
                ..Default::default()
            });
            let favorites = store.load_favorites().await.map_err(action_error)?;
            if favorites.is_empty() {
                println!("No hay contactos favoritos.");
            } else {
                print_contact_table(&favorites);
            }
            Ok(())
        }

        Commands::Fav { id } => {
            let store = build_store(&config_path)?;
            let contact = store.toggle_favorite(id, true).await.map_err(action_error)?;
            println!(
                "⭐ {}",
                format::full_name(&contact.nombre, contact.apellido.as_deref())
            );
            Ok(())
        }

        Commands::Unfav { id } => {
            let store = build_store(&config_path)?;
            let contact = store
                .toggle_favorite(id, false)
                .await
                .map_err(action_error)?;
            println!(
                "Ya no es favorito: {}",
                format::full_name(&contact.nombre, contact.apellido.as_deref())
            );
            Ok(())
        }

        Commands::Stats => {
            let store = build_store(&config_path)?;

            store.load_stats().await;
            check_read(&store)?;

            let state = store.state();
            let stats = state.stats.context("Ocurrió un error inesperado.")?;
            println!("Contactos:      {}", stats.total_contactos);
            println!("Favoritos:      {}", stats.total_favoritos);
            println!("Con email:      {}", stats.contactos_con_email);
            println!("Con teléfono:   {}", stats.contactos_con_telefono);
            if !stats.por_categoria.is_empty() {
                println!();
                println!("Por categoría:");
                let mut by_category: Vec<_> = stats.por_categoria.iter().collect();
                by_category.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
                for (name, count) in by_category {
                    println!("  {name}: {count}");
                }
            }
            if !stats.contactos_recientes.is_empty() {
                println!();
                println!("Recientes:");
                for contact in &stats.contactos_recientes {
                    let when = contact
                        .fecha_creacion
                        .map(format::relative_date)
                        .unwrap_or_default();
                    println!(
                        "  {} {}",
                        format::full_name(&contact.nombre, contact.apellido.as_deref()),
                        when
                    );
                }
            }
            Ok(())
        }

        Commands::Categories { command } => run_categories(command, &config_path).await,

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let cfg = load_config(&config_path)?;
                println!("url       = {}", cfg.server.url);
                println!("theme     = {}", cfg.ui.theme);
                println!("language  = {}", cfg.ui.language);
                println!("page-size = {}", cfg.ui.page_size);
                println!(
                    "token     = {}",
                    if cfg.auth.token.is_some() {
                        "(guardado)"
                    } else {
                        "(ninguno)"
                    }
                );
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                let mut cfg = load_config(&config_path)?;
                match key.as_str() {
                    "url" => cfg.server.url = value,
                    "theme" => cfg.ui.theme = value,
                    "language" => cfg.ui.language = value,
                    "page-size" => {
                        cfg.ui.page_size = value
                            .parse()
                            .context("page-size debe ser un número entero")?;
                    }
                    other => bail!("Clave desconocida: {other} (usa url, theme, language o page-size)"),
                }
                cfg.save_to(&config_path)?;
                println!("Preferencias guardadas.");
                Ok(())
            }
        },
    }
}

async fn run_categories(command: CategoryCommands, config_path: &PathBuf) -> Result<()> {
    let store = build_store(config_path)?;
    match command {
        CategoryCommands::List => {
            store.load_categories().await;
            check_read(&store)?;

            let categories = store.state().categories;
            if categories.is_empty() {
                println!("No hay categorías.");
                return Ok(());
            }
            println!("{:<5} {:<20} {:<9} Descripción", "ID", "Nombre", "Color");
            for category in &categories {
                println!(
                    "{:<5} {:<20} {:<9} {}",
                    category.id,
                    format::truncate(&category.nombre, 20),
                    category.color.as_deref().unwrap_or("-"),
                    format::truncate(category.descripcion.as_deref().unwrap_or(""), 40)
                );
            }
            Ok(())
        }

        CategoryCommands::Add {
            nombre,
            color,
            descripcion,
        } => {
            let data = CategoryRequest {
                nombre,
                color,
                descripcion,
            };
            check_valid(validate::validate_category(&data))?;
            let created = store.create_category(&data).await.map_err(action_error)?;
            println!(
                "Categoría creada exitosamente: {} (id {})",
                created.nombre, created.id
            );
            Ok(())
        }

        CategoryCommands::Edit {
            id,
            nombre,
            color,
            descripcion,
        } => {
            let current = store.api().get_category(id).await.map_err(action_error)?;
            let data = CategoryRequest {
                nombre: nombre.unwrap_or(current.nombre),
                color: color.or(current.color),
                descripcion: descripcion.or(current.descripcion),
            };
            check_valid(validate::validate_category(&data))?;
            let updated = store.update_category(id, &data).await.map_err(action_error)?;
            println!("Categoría actualizada exitosamente: {}", updated.nombre);
            Ok(())
        }

        CategoryCommands::Rm { id, yes } => {
            if !yes && !confirm(&format!("¿Eliminar la categoría {id}?"))? {
                println!("Cancelado.");
                return Ok(());
            }
            store.delete_category(id).await.map_err(action_error)?;
            println!("Categoría eliminada exitosamente.");
            Ok(())
        }
    }
}

fn load_config(path: &PathBuf) -> Result<Config> {
    if path.exists() {
        Config::load_from(path)
    } else {
        Ok(Config::default())
    }
}

fn build_store(config_path: &PathBuf) -> Result<Store> {
    let cfg = load_config(config_path)?;
    store_from(cfg, config_path)
}

fn store_from(cfg: Config, config_path: &PathBuf) -> Result<Store> {
    let api = ApiClient::new(&cfg, config_path.clone())?;
    Ok(Store::new(api))
}

/// Map an action failure to the process exit error, swapping the bare 401
/// for the login instruction.
fn action_error(error: ApiError) -> anyhow::Error {
    match error {
        ApiError::Unauthorized => anyhow::anyhow!(LOGIN_HINT),
        other => anyhow::anyhow!(other.to_string()),
    }
}

/// After a read action: surface the login hint when the 401 path was taken,
/// else the recorded error.
fn check_read(store: &Store) -> Result<()> {
    let state = store.state();
    if state.session_expired {
        bail!(LOGIN_HINT);
    }
    if let Some(error) = state.error {
        bail!(error);
    }
    Ok(())
}

fn check_valid(result: validate::ValidationErrors) -> Result<()> {
    if result.is_valid() {
        return Ok(());
    }
    eprint!("{result}");
    bail!("Por favor, verifica los datos ingresados.");
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [s/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "s" || answer == "si" || answer == "sí" || answer == "y")
}

fn print_contact_table(contacts: &[Contact]) {
    if contacts.is_empty() {
        println!("No hay contactos.");
        return;
    }
    println!(
        "{:<5} {:<25} {:<18} {:<28} {:<15} Fav",
        "ID", "Nombre", "Teléfono", "Email", "Categoría"
    );
    for contact in contacts {
        println!(
            "{:<5} {:<25} {:<18} {:<28} {:<15} {}",
            contact.id,
            format::truncate(
                &format::full_name(&contact.nombre, contact.apellido.as_deref()),
                25
            ),
            format::format_phone(&contact.telefono),
            format::truncate(contact.email.as_deref().unwrap_or(""), 28),
            format::truncate(contact.categoria.as_deref().unwrap_or(""), 15),
            if contact.favorito { "⭐" } else { "" }
        );
    }
}

fn print_contact_detail(contact: &Contact) {
    println!(
        "{}  {}",
        format::initials(&contact.nombre, contact.apellido.as_deref()),
        format::full_name(&contact.nombre, contact.apellido.as_deref())
    );
    println!("  Teléfono:   {}", format::format_phone(&contact.telefono));
    if let Some(email) = &contact.email {
        println!("  Email:      {email}");
    }
    if let Some(direccion) = &contact.direccion {
        println!("  Dirección:  {direccion}");
    }
    if let Some(fecha) = contact.fecha_nacimiento {
        println!("  Nacimiento: {}", format::format_date(fecha));
    }
    if let Some(categoria) = &contact.categoria {
        println!("  Categoría:  {categoria}");
    }
    if contact.favorito {
        println!("  Favorito:   ⭐");
    }
    if let Some(notas) = &contact.notas {
        println!("  Notas:      {notas}");
    }
    if let Some(creado) = contact.fecha_creacion {
        println!("  Creado:     {}", format::format_date_time(creado));
    }
    if let Some(actualizado) = contact.fecha_actualizacion {
        println!("  Actualizado: {}", format::relative_date(actualizado));
    }
}
