mod entropy;
mod fixture;

use entropy::OsEntropy;

fn main() {
    let stdin = std::io::stdin();
    let status = fixture::run(
        &mut OsEntropy,
        std::process::id(),
        stdin.lock(),
        std::io::stdout(),
        std::io::stderr(),
    );
    std::process::exit(status);
}
