use clap::{Arg, ArgAction, Command};
use knc_image::pipeline::{kronecker_compress, neural_compress, PipelineOptions};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = Command::new("knc_image")
        .version("0.1.0")
        .about("크로네커/신경 정지 영상 압축 실험 도구")
        .arg(
            Arg::new("neural")
                .long("neural")
                .action(ArgAction::SetTrue)
                .help("복소수 오토인코더 압축 모드"),
        )
        .arg(
            Arg::new("kronecker")
                .long("kronecker")
                .action(ArgAction::SetTrue)
                .help("크로네커 곱 진화 압축 모드"),
        )
        .arg(
            Arg::new("image")
                .long("image")
                .value_name("PATH")
                .help("입력 이미지 경로")
                .default_value("images/image01.png"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .value_name("DIR")
                .help("아티팩트 출력 디렉토리")
                .default_value("."),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("RNG 시드")
                .default_value("7"),
        )
        .get_matches();

    let image = matches.get_one::<String>("image").unwrap();
    let output = matches.get_one::<String>("output").unwrap();
    let seed: u64 = matches.get_one::<String>("seed").unwrap().parse()?;
    let opts = PipelineOptions::new(image, output, seed);

    // 두 모드 중 하나만 실행한다. 둘 다 꺼져 있으면 아무 일도 하지 않는다.
    if matches.get_flag("neural") {
        neural_compress(&opts)?;
    } else if matches.get_flag("kronecker") {
        kronecker_compress(&opts)?;
    }
    Ok(())
}
