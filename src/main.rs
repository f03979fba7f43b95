use betaseries::{
    ApiError, BetaSeriesClient, BetaSeriesError, Config, ConfigError, Episode, EpisodeTarget,
    GeneralPlanning, HttpTransport, InfosScope, Member, PlanningType, Subtitle, SubtitleLanguage,
    TransportError, WatchedOptions, connect,
};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Command line client for the BetaSeries API.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file (defaults to config.json in the user config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log requests to stderr (-v for this crate, -vv for every crate).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Episode lookups and watch/download markers.
    #[command(subcommand)]
    Episodes(EpisodesCommand),
    /// Friends and blocked members.
    #[command(subcommand)]
    Friends(FriendsCommand),
    /// Member search and profiles.
    #[command(subcommand)]
    Members(MembersCommand),
    /// Broadcast planning.
    #[command(subcommand)]
    Planning(PlanningCommand),
    /// Subtitle listings.
    #[command(subcommand)]
    Subtitles(SubtitlesCommand),
}

/// Selects an episode or show by BetaSeries or TheTVDB id.
#[derive(Debug, Args)]
struct TargetArgs {
    /// BetaSeries id.
    #[arg(long, conflicts_with = "thetvdb", required_unless_present = "thetvdb")]
    id: Option<i64>,
    /// TheTVDB id.
    #[arg(long)]
    thetvdb: Option<i64>,
}

impl TargetArgs {
    fn target(&self) -> EpisodeTarget {
        match (self.id, self.thetvdb) {
            (None, Some(thetvdb)) => EpisodeTarget::TheTvdb(thetvdb),
            (id, _) => EpisodeTarget::Id(id.unwrap_or_default()),
        }
    }
}

#[derive(Debug, Subcommand)]
enum EpisodesCommand {
    /// Show one episode.
    Display {
        #[command(flatten)]
        target: TargetArgs,
        /// Include subtitles.
        #[arg(long)]
        subtitles: bool,
    },
    /// Latest aired episode of a show.
    Latest {
        #[command(flatten)]
        show: TargetArgs,
    },
    /// Next episode to watch in a show.
    Next {
        #[command(flatten)]
        show: TargetArgs,
    },
    /// Find an episode of a show by number (S01E05 or 1x05).
    Search {
        #[arg(long)]
        show_id: i64,
        #[arg(long, default_value = "")]
        number: String,
        #[arg(long)]
        subtitles: bool,
    },
    /// Identify an episode from a file name.
    Scraper { file: String },
    /// Mark an episode as downloaded.
    Downloaded {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Remove the downloaded mark.
    Undownloaded {
        #[command(flatten)]
        target: TargetArgs,
    },
    /// Mark an episode (and by default all previous ones) as watched.
    Watched {
        #[command(flatten)]
        target: TargetArgs,
        /// Only mark this episode.
        #[arg(long)]
        no_bulk: bool,
        /// Unmark the episodes after this one.
        #[arg(long)]
        delete: bool,
        /// Rate the episode from 1 to 5.
        #[arg(long)]
        note: Option<u8>,
    },
    /// Remove the watched mark.
    Unwatched {
        #[command(flatten)]
        target: TargetArgs,
    },
}

#[derive(Debug, Subcommand)]
enum FriendsCommand {
    /// List friends (of the authenticated member unless --id is given).
    List {
        #[arg(long, default_value_t = 0)]
        id: i64,
        /// List blocked members instead.
        #[arg(long)]
        blocked: bool,
    },
    /// Pending friendship requests.
    Requests {
        /// Requests received instead of sent.
        #[arg(long)]
        received: bool,
    },
    /// Add a friend.
    Add { id: i64 },
    /// Remove a friend.
    Remove { id: i64 },
    /// Block a member.
    Block { id: i64 },
    /// Unblock a member.
    Unblock { id: i64 },
}

#[derive(Debug, Subcommand)]
enum MembersCommand {
    /// Search members by login, '%' is a wildcard.
    Search {
        login: String,
        #[arg(long, default_value_t = 0)]
        limit: i64,
    },
    /// Show a member profile.
    Infos {
        id: i64,
        /// full, summary, movies or shows.
        #[arg(long, default_value = "full")]
        scope: InfosScope,
    },
}

#[derive(Debug, Subcommand)]
enum PlanningCommand {
    /// Episodes airing around a date.
    General {
        /// YYYY-MM-DD or now.
        #[arg(long, default_value = "now")]
        date: String,
        #[arg(long, default_value_t = 0)]
        before: u32,
        #[arg(long, default_value_t = 0)]
        after: u32,
        /// premiere or all.
        #[arg(long = "type")]
        kind: Option<PlanningType>,
    },
    /// First upcoming episode of each show.
    Incoming,
    /// Planned episodes of a member.
    Member {
        #[arg(long, default_value_t = 0)]
        id: i64,
        /// Only episodes not watched yet.
        #[arg(long)]
        unseen: bool,
        /// YYYY-MM or now.
        #[arg(long, default_value = "")]
        month: String,
    },
}

#[derive(Debug, Subcommand)]
enum SubtitlesCommand {
    /// Subtitles of an episode.
    Episode {
        id: i64,
        /// all, vovf, vo or vf.
        #[arg(long)]
        language: Option<SubtitleLanguage>,
    },
    /// Subtitles of a show.
    Show {
        id: i64,
        #[arg(long)]
        language: Option<SubtitleLanguage>,
    },
    /// Latest subtitles.
    Last {
        /// How many (at most 100).
        #[arg(long, default_value_t = 0)]
        number: i64,
        #[arg(long)]
        language: Option<SubtitleLanguage>,
    },
}

/// Output of a command, printed once the call succeeded.
enum Output {
    Episode(Episode),
    Episodes(Vec<Episode>),
    Member(Member),
    Members(Vec<Member>),
    Subtitles(Vec<Subtitle>),
}

/// Filter used when `RUST_LOG` is not set.
fn default_directives(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,betaseries=debug",
        _ => "debug",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_episodes(
    client: &BetaSeriesClient<HttpTransport>,
    command: EpisodesCommand,
) -> Result<Output, ApiError> {
    let episode = match command {
        EpisodesCommand::Display { target, subtitles } => {
            client.episode_display(target.target(), subtitles)?
        }
        EpisodesCommand::Latest { show } => client.episode_latest(show.target())?,
        EpisodesCommand::Next { show } => client.episode_next(show.target())?,
        EpisodesCommand::Search {
            show_id,
            number,
            subtitles,
        } => client.episode_search(show_id, &number, subtitles)?,
        EpisodesCommand::Scraper { file } => client.episode_scraper(&file)?,
        EpisodesCommand::Downloaded { target } => client.episode_downloaded(target.target())?,
        EpisodesCommand::Undownloaded { target } => {
            client.episode_not_downloaded(target.target())?
        }
        EpisodesCommand::Watched {
            target,
            no_bulk,
            delete,
            note,
        } => {
            let options = WatchedOptions {
                bulk: !no_bulk,
                delete,
                note,
            };
            client.episode_watched(target.target(), &options)?
        }
        EpisodesCommand::Unwatched { target } => client.episode_not_watched(target.target())?,
    };
    Ok(Output::Episode(episode))
}

fn run_friends(
    client: &BetaSeriesClient<HttpTransport>,
    command: FriendsCommand,
) -> Result<Output, ApiError> {
    Ok(match command {
        FriendsCommand::List { id, blocked } => Output::Members(client.friends_list(id, blocked)?),
        FriendsCommand::Requests { received } => {
            Output::Members(client.friends_requests(received)?)
        }
        FriendsCommand::Add { id } => Output::Member(client.friend_add(id)?),
        FriendsCommand::Remove { id } => Output::Member(client.friend_remove(id)?),
        FriendsCommand::Block { id } => Output::Member(client.friend_block(id)?),
        FriendsCommand::Unblock { id } => Output::Member(client.friend_unblock(id)?),
    })
}

fn run_members(
    client: &BetaSeriesClient<HttpTransport>,
    command: MembersCommand,
) -> Result<Output, ApiError> {
    Ok(match command {
        MembersCommand::Search { login, limit } => {
            Output::Members(client.members_search(&login, limit)?)
        }
        MembersCommand::Infos { id, scope } => Output::Member(client.members_infos(id, scope)?),
    })
}

fn run_planning(
    client: &BetaSeriesClient<HttpTransport>,
    command: PlanningCommand,
) -> Result<Output, ApiError> {
    let episodes = match command {
        PlanningCommand::General {
            date,
            before,
            after,
            kind,
        } => client.planning_general(&GeneralPlanning {
            date,
            before,
            after,
            kind,
        })?,
        PlanningCommand::Incoming => client.planning_incoming()?,
        PlanningCommand::Member { id, unseen, month } => {
            client.planning_member(id, unseen, &month)?
        }
    };
    Ok(Output::Episodes(episodes))
}

fn run_subtitles(
    client: &BetaSeriesClient<HttpTransport>,
    command: SubtitlesCommand,
) -> Result<Output, ApiError> {
    let subtitles = match command {
        SubtitlesCommand::Episode { id, language } => client.subtitles_episode(id, language)?,
        SubtitlesCommand::Show { id, language } => client.subtitles_show(id, language)?,
        SubtitlesCommand::Last { number, language } => client.subtitles_last(number, language)?,
    };
    Ok(Output::Subtitles(subtitles))
}

fn run(cli: Cli) -> Result<Output, BetaSeriesError> {
    let config = Config::load(cli.config.as_deref())?;
    let client = connect(&config)?;

    let output = match cli.command {
        Command::Episodes(command) => run_episodes(&client, command)?,
        Command::Friends(command) => run_friends(&client, command)?,
        Command::Members(command) => run_members(&client, command)?,
        Command::Planning(command) => run_planning(&client, command)?,
        Command::Subtitles(command) => run_subtitles(&client, command)?,
    };
    Ok(output)
}

fn print_episode(episode: &Episode) {
    let mut flags = Vec::new();
    if episode.user.seen {
        flags.push("seen");
    }
    if episode.user.downloaded {
        flags.push("downloaded");
    }

    println!(
        "{} - {} [{}] (show: {}, id: {})",
        episode.code, episode.title, episode.date, episode.show.title, episode.id
    );
    if !flags.is_empty() {
        println!("  Status: {}", flags.join(", "));
    }
    if episode.note.total > 0 {
        println!(
            "  Rating: {:.1} ({} votes)",
            episode.note.mean, episode.note.total
        );
    }
    for subtitle in &episode.subtitles {
        println!("  Subtitle: {} {} {}", subtitle.language, subtitle.source, subtitle.url);
    }
}

fn print_member(member: &Member) {
    println!("{} (id: {}, xp: {})", member.login, member.id, member.xp);
    if let Some(stats) = &member.stats {
        println!(
            "  Shows: {}, episodes: {}, friends: {}, progress: {:.1}%",
            stats.shows, stats.episodes, stats.friends, stats.progress
        );
    }
    for show in &member.favorites {
        println!("  Favorite: {} (id: {})", show.title, show.id);
    }
}

fn print_subtitle(subtitle: &Subtitle) {
    println!(
        "{} {} q{} S{:02}E{:02} {} ({})",
        subtitle.language,
        subtitle.source,
        subtitle.quality,
        subtitle.episode.season,
        subtitle.episode.episode,
        subtitle.file,
        subtitle.url
    );
}

fn print_output(output: &Output) {
    match output {
        Output::Episode(episode) => print_episode(episode),
        Output::Episodes(episodes) => episodes.iter().for_each(print_episode),
        Output::Member(member) => print_member(member),
        Output::Members(members) => members.iter().for_each(print_member),
        Output::Subtitles(subtitles) => subtitles.iter().for_each(print_subtitle),
    }
}

/// Maps each class of failure to its own exit status.
fn exit_code(error: &BetaSeriesError) -> i32 {
    match error {
        BetaSeriesError::Api(e) if e.is_not_found() => 1,
        BetaSeriesError::Api(e) if e.is_local() => 2,
        BetaSeriesError::Config(_) | BetaSeriesError::Api(ApiError::InvalidBaseUrl { .. }) => 3,
        BetaSeriesError::Transport(TransportError::InvalidHeader { .. }) => 3,
        BetaSeriesError::Transport(_) | BetaSeriesError::Api(ApiError::Transport(_)) => 4,
        BetaSeriesError::Api(_) => 5,
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(output) => print_output(&output),
        Err(e) => {
            eprintln!("Error: {}", e);
            if matches!(e, BetaSeriesError::Config(ConfigError::MissingApiKey)) {
                eprintln!("Register an application at https://www.betaseries.com/api/ to get a key.");
            }
            process::exit(exit_code(&e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    fn max_level(verbose: u8) -> Option<LevelFilter> {
        EnvFilter::try_new(default_directives(verbose))
            .unwrap()
            .max_level_hint()
    }

    #[test]
    fn test_verbose_enables_debug_events() {
        assert_eq!(max_level(0), Some(LevelFilter::WARN));
        assert_eq!(max_level(1), Some(LevelFilter::DEBUG));
        assert_eq!(max_level(2), Some(LevelFilter::DEBUG));
        assert!(default_directives(1).contains("betaseries=debug"));
    }

    #[test]
    fn test_exit_codes_per_failure_class() {
        let code = |e: ApiError| exit_code(&BetaSeriesError::Api(e));
        assert_eq!(code(ApiError::NoEpisodesFound), 1);
        assert_eq!(code(ApiError::MissingParameter { name: "id" }), 2);
        assert_eq!(exit_code(&BetaSeriesError::Config(ConfigError::MissingApiKey)), 3);
        assert_eq!(
            code(ApiError::HttpStatus {
                endpoint: "/members/infos".to_string(),
                query: "id=1".to_string(),
                status: 500,
                body: String::new(),
            }),
            5
        );
    }
}
