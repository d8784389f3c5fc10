use clap::{arg,crate_version,value_parser,ArgMatches,Command};
use lzxdict::{scan,Options,STD_OPTIONS};
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const RCH: &str = "unreachable was reached";

fn ok_to_overwrite(path_out: &str) -> bool {
    if let Ok(_f) = std::fs::File::open(path_out) {
        let mut ans = String::new();
        eprint!("{} exists, overwrite? (y/n) ",path_out);
        std::io::stdin().read_line(&mut ans).expect("could not read stdin");
        if ans.trim_end()=="y" || ans.trim_end()=="Y" {
            log::warn!("existing file will be replaced");
            return true;
        }
        return false;
    }
    true
}

fn search_args(cmd: Command) -> Command {
    cmd.arg(arg!(-i --input <PATH> "input path").required(true))
        .arg(arg!(-w --window <SIZE> "window size, power of two").value_parser(value_parser!(usize))
            .required(false))
        .arg(arg!(-p --probes <COUNT> "maximum chain candidates per search").value_parser(value_parser!(usize))
            .required(false))
}

fn options(cmd: &ArgMatches) -> Options {
    let mut opt = STD_OPTIONS;
    if let Some(w) = cmd.get_one::<usize>("window") {
        opt.window_size = *w;
    }
    opt.max_probes = cmd.get_one::<usize>("probes").copied();
    opt
}

fn main() -> STDRESULT
{
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let long_help =
"Examples:
---------
Statistics:    `lzxdict scan -i my_file -w 65536`
Token listing: `lzxdict tokens -i my_file -o my_tokens -p 64`";

    let mut main_cmd = Command::new("lzxdict")
        .about("Find LZX style matches with a hash chain dictionary")
        .after_long_help(long_help)
        .version(crate_version!());
    main_cmd = main_cmd.subcommand(search_args(Command::new("scan"))
        .arg(arg!(--verify "check every match against the input"))
        .about("summarize the matches found in a file"));

    main_cmd = main_cmd.subcommand(search_args(Command::new("tokens"))
        .arg(arg!(-o --output <PATH> "output path").required(true))
        .about("list literals and matches, one per line"));

    let matches = main_cmd.get_matches();

    if let Some(cmd) = matches.subcommand_matches("scan") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let opt = options(cmd);
        if cmd.get_flag("verify") {
            let data = std::fs::read(path_in)?;
            let tokens = scan::scan(&data,&opt)?;
            if !scan::check_tokens(&data,&tokens) {
                eprintln!("verification failed");
                return Err(Box::new(std::fmt::Error));
            }
            println!("{}",scan::Stats::from_tokens(&tokens));
            eprintln!("verified {} tokens",tokens.len());
        } else {
            let mut in_file = std::fs::File::open(path_in)?;
            let stats = scan::scan_reader(&mut in_file,&opt)?;
            println!("{}",stats);
        }
    }

    if let Some(cmd) = matches.subcommand_matches("tokens") {
        let path_in = cmd.get_one::<String>("input").expect(RCH);
        let path_out = cmd.get_one::<String>("output").expect(RCH);
        let opt = options(cmd);
        if !ok_to_overwrite(path_out) {
            eprintln!("abort operation");
            return Ok(());
        }
        let data = std::fs::read(path_in)?;
        let tokens = scan::scan(&data,&opt)?;
        let mut out_file = std::io::BufWriter::new(std::fs::File::create(path_out)?);
        scan::write_tokens(&tokens,&mut out_file)?;
        eprintln!("listed {} tokens for {} bytes",tokens.len(),data.len());
    }

    Ok(())
}
