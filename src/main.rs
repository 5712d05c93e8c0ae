use keyscan::argv;
use std::process;


/// Reserved first argument that runs the in-process self-test instead of the tool
const SELF_TEST_FLAG: &str = "--self-test";

fn main() {
    let args = match argv::from_os(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(2);
        }
    };

    let code = if args.len() > 1 && args[1] != SELF_TEST_FLAG {
        // Pass everything after the program name straight through to the tool
        match keyscan::runner().and_then(|runner| runner.run_direct(args[1..].to_vec())) {
            Ok(code) => code,
            Err(err) => {
                eprintln!("Error: {:#}", err);
                1
            }
        }
    } else {
        self_test::run()
    };

    process::exit(code);
}
