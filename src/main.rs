fn main() {
    gthunk::cli::run();
}
