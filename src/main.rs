fn main() {
    env_logger::init();
    ferrite::board::init();
    ferrite::uci::run();
}
