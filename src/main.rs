mod audio;
mod bluetooth;
mod config;
mod dispatch;
mod gpio;
mod library;
mod runtime;
mod scanner;
mod session;
#[cfg(test)]
mod testing;

fn main() -> anyhow::Result<()> {
    runtime::run()
}
